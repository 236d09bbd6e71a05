use crate::domain::model::{
    AbbrSource, AbbrStatus, AbbreviationRecord, NewAbbreviation, Origin, ProductRecord,
};
use crate::domain::ports::{AbbreviationWriter, CatalogStore};
use crate::utils::error::{MatchError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// 메모리 카탈로그. CSV 시드로 채워 CLI 단독 실행에 쓰고, 테스트의 기본
/// 저장소로도 쓴다.
#[derive(Default)]
pub struct MemoryCatalog {
    abbreviations: RwLock<Vec<AbbreviationRecord>>,
    products: RwLock<Vec<ProductRecord>>,
    next_id: AtomicU64,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_product(&self, product: ProductRecord) {
        self.products.write().await.push(product);
    }

    /// 시드 약어 등록. `usage_count` 0, `source` Default로 들어간다.
    pub async fn insert_seed_abbreviation(
        &self,
        input_abbr: &str,
        product_code: &str,
        product_name: &str,
    ) -> String {
        let id = self.allocate_id();
        let record = AbbreviationRecord {
            id: id.clone(),
            input_abbr: input_abbr.to_string(),
            standard_abbr: input_abbr.to_string(),
            product_code: product_code.to_string(),
            product_name: product_name.to_string(),
            created_at: Utc::now(),
            source: AbbrSource::Default,
            usage_count: 0,
            status: AbbrStatus::Active,
            notes: Some("Initial Import".to_string()),
        };
        self.abbreviations.write().await.push(record);
        id
    }

    pub async fn get_abbreviation(&self, id: &str) -> Option<AbbreviationRecord> {
        self.abbreviations
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub async fn abbreviation_count(&self) -> usize {
        self.abbreviations.read().await.len()
    }

    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }

    fn allocate_id(&self) -> String {
        format!("abbr-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_abbreviations_by_input(
        &self,
        input: &str,
        active_only: bool,
    ) -> Result<Vec<AbbreviationRecord>> {
        let abbreviations = self.abbreviations.read().await;
        let mut found: Vec<AbbreviationRecord> = abbreviations
            .iter()
            .filter(|r| r.input_abbr == input)
            .filter(|r| !active_only || r.status == AbbrStatus::Active)
            .cloned()
            .collect();
        // 인터페이스 계약: 최신 등록 순
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_products_by_prefix(
        &self,
        prefix: &str,
        origin: Option<Origin>,
    ) -> Result<Vec<ProductRecord>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| p.model.starts_with(prefix))
            .filter(|p| origin.map_or(true, |o| p.origin == o))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AbbreviationWriter for MemoryCatalog {
    async fn record_abbreviation(&self, entry: NewAbbreviation) -> Result<String> {
        let id = self.allocate_id();
        let record = AbbreviationRecord {
            id: id.clone(),
            input_abbr: entry.input_abbr.clone(),
            standard_abbr: entry.input_abbr,
            product_code: entry.product_code,
            product_name: entry.product_name,
            created_at: Utc::now(),
            source: entry.source,
            usage_count: 1,
            status: AbbrStatus::Active,
            notes: Some(entry.notes),
        };
        self.abbreviations.write().await.push(record);
        Ok(id)
    }

    async fn increment_usage(&self, id: &str) -> Result<()> {
        let mut abbreviations = self.abbreviations.write().await;
        match abbreviations.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.usage_count += 1;
                Ok(())
            }
            None => Err(MatchError::StoreError {
                message: format!("unknown abbreviation id: {}", id),
            }),
        }
    }
}
