use crate::adapters::memory::MemoryCatalog;
use crate::domain::model::{Origin, ProductRecord};
use crate::utils::error::Result;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ProductRow {
    code: String,
    model: String,
    origin: Origin,
}

#[derive(Debug, Deserialize)]
struct AbbreviationRow {
    input_abbr: String,
    product_code: String,
    product_name: String,
}

/// 품목 카탈로그 CSV(`code,model,origin`)를 메모리 카탈로그에 적재한다.
pub async fn load_products_csv(catalog: &MemoryCatalog, path: &Path) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut count = 0;
    for row in reader.deserialize() {
        let row: ProductRow = row?;
        catalog
            .insert_product(ProductRecord {
                code: row.code,
                model: row.model,
                origin: row.origin,
            })
            .await;
        count += 1;
    }

    tracing::debug!("Loaded {} products from {}", count, path.display());
    Ok(count)
}

/// 시드 약어 CSV(`input_abbr,product_code,product_name`)를 적재한다.
pub async fn load_abbreviations_csv(catalog: &MemoryCatalog, path: &Path) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut count = 0;
    for row in reader.deserialize() {
        let row: AbbreviationRow = row?;
        catalog
            .insert_seed_abbreviation(&row.input_abbr, &row.product_code, &row.product_name)
            .await;
        count += 1;
    }

    tracing::debug!("Loaded {} abbreviations from {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CatalogStore;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_products_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "code,model,origin").unwrap();
        writeln!(file, "16212,포터2 RH,국산").unwrap();
        writeln!(file, "70001,볼보V60,수입").unwrap();

        let catalog = MemoryCatalog::new();
        let count = load_products_csv(&catalog, &path).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(catalog.product_count().await, 2);
        let domestic = catalog
            .find_products_by_prefix("포", Some(Origin::Domestic))
            .await
            .unwrap();
        assert_eq!(domestic.len(), 1);
        assert_eq!(domestic[0].code, "16212");
    }

    #[tokio::test]
    async fn test_load_abbreviations_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abbreviations.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "input_abbr,product_code,product_name").unwrap();
        writeln!(file, "포터2,16212,포터2 RH").unwrap();
        writeln!(file, "포터2,16211,포터2 LH").unwrap();

        let catalog = MemoryCatalog::new();
        let count = load_abbreviations_csv(&catalog, &path).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(catalog.abbreviation_count().await, 2);
        let found = catalog
            .find_abbreviations_by_input("포터2", true)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let catalog = MemoryCatalog::new();
        let result = load_products_csv(&catalog, Path::new("no/such/file.csv")).await;
        assert!(result.is_err());
    }
}
