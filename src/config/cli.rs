use crate::config::file::FileConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_url, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "jumun-match")]
#[command(about = "부품 주문 텍스트를 품목 코드 라인으로 변환")]
pub struct CliConfig {
    /// 주문 텍스트 파일. 생략하면 표준 입력을 읽는다
    #[arg(long)]
    pub input: Option<String>,

    /// 품목 카탈로그 CSV (code,model,origin)
    #[arg(long, default_value = "data/products.csv")]
    pub products_file: String,

    /// 시드 약어 CSV (input_abbr,product_code,product_name)
    #[arg(long, default_value = "data/abbreviations.csv")]
    pub abbreviations_file: String,

    /// 원격 카탈로그 서비스 주소. 지정하면 CSV 대신 원격 조회를 쓴다
    #[arg(long)]
    pub catalog_url: Option<String>,

    /// 변환 결과 TSV 저장 경로. 생략하면 표준 출력
    #[arg(long)]
    pub output: Option<String>,

    /// 유사 매칭(pending) 항목을 모두 승인 처리한다
    #[arg(long)]
    pub accept_pending: bool,

    /// TOML 설정 파일
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 설정 파일 값을 반영한다. 명령줄의 선택 인자가 이미 있으면 그쪽이
    /// 이기고, 경로 기본값은 파일 값으로 대체된다.
    pub fn merge_file(&mut self, file: &FileConfig) {
        if let Some(catalog) = &file.catalog {
            if let Some(products) = &catalog.products_file {
                self.products_file = products.clone();
            }
            if let Some(abbreviations) = &catalog.abbreviations_file {
                self.abbreviations_file = abbreviations.clone();
            }
            if self.catalog_url.is_none() {
                self.catalog_url = catalog.url.clone();
            }
        }
        if let Some(output) = &file.output {
            if self.output.is_none() {
                self.output = output.path.clone();
            }
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.catalog_url {
            validate_url("catalog_url", url)?;
        } else {
            validate_path("products_file", &self.products_file)?;
            validate_path("abbreviations_file", &self.abbreviations_file)?;
        }
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        Ok(())
    }
}
