use crate::domain::model::{AbbreviationRecord, NewAbbreviation, Origin, ProductRecord};
use crate::domain::ports::{AbbreviationWriter, CatalogStore};
use crate::utils::error::{MatchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// 원격 카탈로그 서비스 클라이언트. 저장소 자체는 외부 협력자이고, 여기서는
/// 조회/기록 엔드포인트만 감싼다.
pub struct RemoteCatalog {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

impl RemoteCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CatalogStore for RemoteCatalog {
    async fn find_abbreviations_by_input(
        &self,
        input: &str,
        active_only: bool,
    ) -> Result<Vec<AbbreviationRecord>> {
        let url = format!("{}/abbreviations", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("input", input)])
            .query(&[("active", if active_only { "true" } else { "false" })])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MatchError::StoreError {
                message: format!(
                    "abbreviation query failed with status {}",
                    response.status()
                ),
            });
        }
        Ok(response.json().await?)
    }

    async fn find_products_by_prefix(
        &self,
        prefix: &str,
        origin: Option<Origin>,
    ) -> Result<Vec<ProductRecord>> {
        let url = format!("{}/products", self.base_url);
        let mut request = self.client.get(&url).query(&[("prefix", prefix)]);
        if let Some(origin) = origin {
            request = request.query(&[("origin", origin.as_str())]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MatchError::StoreError {
                message: format!("product query failed with status {}", response.status()),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AbbreviationWriter for RemoteCatalog {
    async fn record_abbreviation(&self, entry: NewAbbreviation) -> Result<String> {
        let url = format!("{}/abbreviations", self.base_url);
        let response = self.client.post(&url).json(&entry).send().await?;

        if !response.status().is_success() {
            return Err(MatchError::StoreError {
                message: format!(
                    "abbreviation write failed with status {}",
                    response.status()
                ),
            });
        }
        let body: IdResponse = response.json().await?;
        Ok(body.id)
    }

    async fn increment_usage(&self, id: &str) -> Result<()> {
        let url = format!("{}/abbreviations/{}/usage", self.base_url, id);
        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(MatchError::StoreError {
                message: format!("usage increment failed with status {}", response.status()),
            });
        }
        Ok(())
    }
}
