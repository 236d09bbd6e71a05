use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 품목명을 파싱하지 못한 라인에 부여되는 자리표시 값.
/// `parse_order_text`의 문맥 승계 단계에서 직전 품목명으로 대체된다.
pub const UNKNOWN_PRODUCT: &str = "알 수 없는 품목";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "전방")]
    Front,
    #[serde(rename = "후방")]
    Rear,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Front => write!(f, "전방"),
            Position::Rear => write!(f, "후방"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    LH,
    RH,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::LH => write!(f, "LH"),
            Side::RH => write!(f, "RH"),
        }
    }
}

/// 주문 텍스트 한 줄에서 추출된 항목.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedItem {
    pub original: String,
    pub product: String,
    pub position: Position,
    pub side: Side,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "국산")]
    Domestic,
    #[serde(rename = "수입")]
    Imported,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Domestic => "국산",
            Origin::Imported => "수입",
        }
    }
}

/// 품목 카탈로그 레코드. 매칭 관점에서는 읽기 전용이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub code: String,
    pub model: String,
    pub origin: Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbbrSource {
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "auto_learn")]
    AutoLearn,
    #[serde(rename = "manual")]
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbbrStatus {
    Active,
    Inactive,
}

/// 학습되었거나 시드로 등록된 약어 → 품목 매핑.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbbreviationRecord {
    pub id: String,
    pub input_abbr: String,
    pub standard_abbr: String,
    pub product_code: String,
    pub product_name: String,
    pub created_at: DateTime<Utc>,
    pub source: AbbrSource,
    pub usage_count: u32,
    pub status: AbbrStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Writer에 전달되는 신규 약어. `standard_abbr`, `usage_count`, `status`,
/// `created_at`은 저장 시점에 writer가 채운다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAbbreviation {
    pub input_abbr: String,
    pub product_code: String,
    pub product_name: String,
    pub source: AbbrSource,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Confirmed,
    Pending,
    Edited,
    Failed,
}

/// 한 라인의 최종 매칭 결과. 세션에 `(line_number, side, position)` 키로
/// 저장된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedLine {
    pub line_number: usize,
    pub original_line: String,
    pub parsed_product: String,
    pub matched_code: String,
    pub matched_name: String,
    pub position: Position,
    pub side: Side,
    pub quantity: u32,
    pub confidence: u8,
    pub status: MatchStatus,
    pub user_edited: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_items: usize,
    pub auto_matched: usize,
    pub manually_edited: usize,
}
