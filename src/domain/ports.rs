use crate::domain::model::{AbbreviationRecord, NewAbbreviation, Origin, ProductRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 카탈로그 조회 인터페이스. 실제 저장소(메모리, 원격 서비스)는 어댑터가 맡는다.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// `input_abbr`가 정확히 일치하는 약어 레코드를 최신 등록 순으로 돌려준다.
    async fn find_abbreviations_by_input(
        &self,
        input: &str,
        active_only: bool,
    ) -> Result<Vec<AbbreviationRecord>>;

    /// `model`이 `prefix`로 시작하는 품목을 돌려준다. `origin`이 주어지면 해당
    /// 구분으로 한정한다.
    async fn find_products_by_prefix(
        &self,
        prefix: &str,
        origin: Option<Origin>,
    ) -> Result<Vec<ProductRecord>>;
}

/// 약어 기록 인터페이스. 매칭 엔진은 실패를 로그로만 남기고 전파하지 않는다.
#[async_trait]
pub trait AbbreviationWriter: Send + Sync {
    /// 새 약어를 저장하고 생성된 id를 돌려준다.
    async fn record_abbreviation(&self, entry: NewAbbreviation) -> Result<String>;

    async fn increment_usage(&self, id: &str) -> Result<()>;
}
