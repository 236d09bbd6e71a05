use crate::core::learn::LearnQueue;
use crate::core::similarity::{clean_key, similarity};
use crate::domain::model::{
    AbbrSource, AbbreviationRecord, MatchStatus, MatchedLine, NewAbbreviation, Origin, ParsedItem,
    Position, ProductRecord, Side,
};
use crate::domain::ports::{AbbreviationWriter, CatalogStore};
use crate::utils::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

/// 단독으로는 품목을 특정할 수 없는 범용 수식어. 학습 대상에서 제외된다.
const RESTRICTED_TERMS: &[&str] = &["뉴", "올뉴", "더뉴", "그랜드"];

const SIMILARITY_FLOOR: f64 = 0.5;
const AUTO_LEARN_THRESHOLD: u8 = 85;
const POSITION_MISMATCH_WEIGHT: f64 = 0.1;
const CONTAINMENT_FLOOR: f64 = 0.8;

/// 한 항목에 대한 매칭 엔진의 판정.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Matched {
        code: String,
        name: String,
        confidence: u8,
    },
    NoMatch(NoMatchReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatchReason {
    /// 입력이 너무 짧거나 제한어라서 조회 자체를 하지 않음
    InputRejected,
    /// 모든 후보가 유사도 하한 미달
    BelowFloor,
    /// 카탈로그 조회 실패. 해당 항목만 실패로 처리된다
    StoreUnavailable,
}

pub struct MatchEngine<S, W> {
    store: Arc<S>,
    writer: Arc<W>,
    learner: LearnQueue,
}

impl<S, W> MatchEngine<S, W>
where
    S: CatalogStore + 'static,
    W: AbbreviationWriter + 'static,
{
    pub fn new(store: Arc<S>, writer: Arc<W>) -> Self {
        let learner = LearnQueue::spawn(Arc::clone(&writer));
        Self {
            store,
            writer,
            learner,
        }
    }

    /// 학습 큐를 비우고 엔진을 종료한다.
    pub async fn close(self) {
        self.learner.close().await;
    }

    /// 파싱된 항목 하나를 약어 정확 매칭 -> 유사도 검색 순서로 해석한다.
    pub async fn resolve(&self, item: &ParsedItem) -> Resolution {
        let trimmed = item.product.trim();
        if !eligible_input(trimmed) {
            return Resolution::NoMatch(NoMatchReason::InputRejected);
        }

        match self.find_exact(trimmed, item.side, item.position).await {
            Ok(Some(record)) => {
                self.learner.bump(record.id.clone());
                return Resolution::Matched {
                    code: record.product_code,
                    name: record.product_name,
                    confidence: 100,
                };
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Exact abbreviation lookup failed for '{}': {}", trimmed, e);
            }
        }

        match self.fuzzy_search(trimmed, item.position).await {
            Ok(Some((product, confidence))) => {
                if confidence >= AUTO_LEARN_THRESHOLD {
                    self.learner.record(NewAbbreviation {
                        input_abbr: trimmed.to_string(),
                        product_code: product.code.clone(),
                        product_name: product.model.clone(),
                        source: AbbrSource::AutoLearn,
                        notes: format!("자동 학습 (유사도 {}%)", confidence),
                    });
                }
                Resolution::Matched {
                    code: product.code,
                    name: product.model,
                    confidence,
                }
            }
            Ok(None) => Resolution::NoMatch(NoMatchReason::BelowFloor),
            Err(e) => {
                tracing::warn!("Fuzzy catalog search failed for '{}': {}", trimmed, e);
                Resolution::NoMatch(NoMatchReason::StoreUnavailable)
            }
        }
    }

    /// 한 라인의 최종 결과를 만든다. 정확 매칭(100%)은 방향 보정을 거친다.
    pub async fn resolve_line(&self, line_number: usize, item: &ParsedItem) -> MatchedLine {
        match self.resolve(item).await {
            Resolution::Matched {
                code,
                name,
                confidence,
            } => {
                let (code, name) = if confidence == 100 {
                    self.correct_side(&item.product, item.side, code, name).await
                } else {
                    (code, name)
                };
                let status = if confidence == 100 {
                    MatchStatus::Confirmed
                } else {
                    MatchStatus::Pending
                };
                MatchedLine {
                    line_number,
                    original_line: item.original.clone(),
                    parsed_product: item.product.clone(),
                    matched_code: code,
                    matched_name: name,
                    position: item.position,
                    side: item.side,
                    quantity: item.quantity,
                    confidence,
                    status,
                    user_edited: false,
                }
            }
            Resolution::NoMatch(reason) => {
                tracing::debug!(
                    "No match for line {} ('{}'): {:?}",
                    line_number,
                    item.product,
                    reason
                );
                MatchedLine {
                    line_number,
                    original_line: item.original.clone(),
                    parsed_product: item.product.clone(),
                    matched_code: String::new(),
                    matched_name: String::new(),
                    position: item.position,
                    side: item.side,
                    quantity: item.quantity,
                    confidence: 0,
                    status: MatchStatus::Failed,
                    user_edited: false,
                }
            }
        }
    }

    /// 유사 매칭(`Pending`) 결과를 사용자가 승인한 경우. 확정으로 올리고
    /// 원래 유사도를 비고에 남겨 약어로 저장한다.
    pub async fn confirm_pending(&self, line: &MatchedLine) -> MatchedLine {
        let mut confirmed = line.clone();
        confirmed.status = MatchStatus::Confirmed;
        confirmed.confidence = 100;

        self.write_abbreviation(
            &line.parsed_product,
            &line.matched_code,
            &line.matched_name,
            AbbrSource::AutoLearn,
            format!("유사 매칭 확정 (원본 유사도: {}%)", line.confidence),
        )
        .await;

        confirmed
    }

    /// 사용자가 카탈로그에서 직접 품목을 고른 경우. 요청 방향과 다른 쪽이
    /// 선택되었으면 반대 방향 레코드로 바꿔준다.
    pub async fn manual_select(
        &self,
        line_number: usize,
        item: &ParsedItem,
        code: &str,
        name: &str,
        save_abbreviation: bool,
    ) -> MatchedLine {
        let mut code = code.to_string();
        let mut name = name.to_string();

        if let Some(matched_side) = name_side(&name) {
            if matched_side != item.side {
                let base = strip_side_marker(&name);
                match self.find_side_variant_in_products(&base, item.side).await {
                    Ok(Some((c, n))) => {
                        code = c;
                        name = n;
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!("Side correction failed for '{}': {}", name, e),
                }
            }
        }

        if save_abbreviation {
            self.write_abbreviation(
                &item.product,
                &code,
                &name,
                AbbrSource::Manual,
                "수동 매칭 (방향 보정 적용)".to_string(),
            )
            .await;
        }

        MatchedLine {
            line_number,
            original_line: item.original.clone(),
            parsed_product: item.product.clone(),
            matched_code: code,
            matched_name: name,
            position: item.position,
            side: item.side,
            quantity: item.quantity,
            confidence: 100,
            status: MatchStatus::Edited,
            user_edited: true,
        }
    }

    /// 1단계: 약어 정확 매칭. 최신 레코드 우선, 위치 필터, 방향 선호 순서.
    /// 위치 필터가 후보를 모두 걸러내면 정확 일치가 있어도 버리고 유사도
    /// 검색이 결정하게 한다.
    async fn find_exact(
        &self,
        input: &str,
        side: Side,
        position: Position,
    ) -> Result<Option<AbbreviationRecord>> {
        let mut records = self.store.find_abbreviations_by_input(input, true).await?;
        if records.is_empty() {
            return Ok(None);
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let candidates: Vec<AbbreviationRecord> = records
            .into_iter()
            .filter(|r| name_position(&r.product_name) == position)
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }

        if let Some(record) = candidates
            .iter()
            .find(|r| name_has_side(&r.product_name, side))
        {
            return Ok(Some(record.clone()));
        }
        Ok(candidates.into_iter().next())
    }

    /// 3단계: 첫 글자 접두 범위로 품목 카탈로그를 훑는 유사도 검색.
    /// 국산 우선, 없으면 전체로 넓힌다.
    async fn fuzzy_search(
        &self,
        input: &str,
        position: Position,
    ) -> Result<Option<(ProductRecord, u8)>> {
        let prefix: String = match input.chars().next() {
            Some(c) => c.to_string(),
            None => return Ok(None),
        };

        let mut products = self
            .store
            .find_products_by_prefix(&prefix, Some(Origin::Domestic))
            .await?;
        if products.is_empty() {
            products = self.store.find_products_by_prefix(&prefix, None).await?;
        }

        let clean_input = clean_key(input);
        let mut best: Option<(ProductRecord, f64)> = None;

        for product in products {
            let clean_model = clean_key(&product.model);
            let weight = if name_position(&product.model) == position {
                1.0
            } else {
                POSITION_MISMATCH_WEIGHT
            };

            let mut score = similarity(&clean_input, &clean_model) * weight;
            // 부분 포함은 편집 거리와 무관하게 강한 근거로 본다
            if clean_model.contains(&clean_input) || clean_input.contains(&clean_model) {
                score = score.max(CONTAINMENT_FLOOR * weight);
            }

            if best.as_ref().map_or(true, |(_, s)| score > *s) {
                best = Some((product, score));
            }
        }

        match best {
            Some((product, score)) if score >= SIMILARITY_FLOOR => {
                Ok(Some((product, (score * 100.0).round() as u8)))
            }
            _ => Ok(None),
        }
    }

    /// 2단계: 정확 매칭 결과의 방향 표기가 요청 방향과 다르면, 같은 입력
    /// 약어 또는 같은 기본 모델명에서 요청 방향 레코드를 찾아 바꾼다.
    /// 보정 실패는 오류가 아니고 원래 결과를 유지한다.
    async fn correct_side(
        &self,
        input: &str,
        requested: Side,
        code: String,
        name: String,
    ) -> (String, String) {
        let matched_side = match name_side(&name) {
            Some(s) => s,
            None => return (code, name),
        };
        if matched_side == requested {
            return (code, name);
        }

        match self.store.find_abbreviations_by_input(input, true).await {
            Ok(records) => {
                if let Some(record) = records
                    .into_iter()
                    .find(|r| name_has_side(&r.product_name, requested))
                {
                    return (record.product_code, record.product_name);
                }
            }
            Err(e) => {
                tracing::warn!("Side correction abbreviation lookup failed: {}", e);
                return (code, name);
            }
        }

        let base = strip_side_marker(&name);
        match self.find_side_variant_in_products(&base, requested).await {
            Ok(Some((c, n))) => (c, n),
            Ok(None) => (code, name),
            Err(e) => {
                tracing::warn!("Side correction product lookup failed: {}", e);
                (code, name)
            }
        }
    }

    async fn find_side_variant_in_products(
        &self,
        base: &str,
        requested: Side,
    ) -> Result<Option<(String, String)>> {
        let products = self.store.find_products_by_prefix(base, None).await?;
        Ok(products
            .into_iter()
            .find(|p| name_has_side(&p.model, requested))
            .map(|p| (p.code, p.model)))
    }

    /// 확정/수동 매칭의 약어 저장. 실패는 경고로만 남긴다.
    async fn write_abbreviation(
        &self,
        input: &str,
        code: &str,
        name: &str,
        source: AbbrSource,
        notes: String,
    ) {
        let trimmed = input.trim();
        if !eligible_input(trimmed) {
            return;
        }

        let entry = NewAbbreviation {
            input_abbr: trimmed.to_string(),
            product_code: code.to_string(),
            product_name: name.to_string(),
            source,
            notes,
        };
        if let Err(e) = self.writer.record_abbreviation(entry).await {
            tracing::warn!("Failed to save abbreviation '{}': {}", trimmed, e);
        }
    }
}

/// 길이 1 이하이거나 제한어면 조회/학습 대상이 아니다.
fn eligible_input(input: &str) -> bool {
    input.chars().count() > 1 && !RESTRICTED_TERMS.contains(&input)
}

/// 품목명에 박힌 위치 표기. `후` 또는 `REAR`가 있으면 후방.
fn name_position(name: &str) -> Position {
    if name.contains('후') || name.to_uppercase().contains("REAR") {
        Position::Rear
    } else {
        Position::Front
    }
}

fn name_has_side(name: &str, side: Side) -> bool {
    let marker = match side {
        Side::LH => "LH",
        Side::RH => "RH",
    };
    name.to_uppercase().contains(marker)
}

/// 품목명에 박힌 방향 표기. RH 우선.
fn name_side(name: &str) -> Option<Side> {
    let upper = name.to_uppercase();
    if upper.contains("RH") {
        Some(Side::RH)
    } else if upper.contains("LH") {
        Some(Side::LH)
    } else {
        None
    }
}

/// 품목명 앞뒤의 LH/RH 표기를 한 번 제거해 기본 모델명을 얻는다.
fn strip_side_marker(name: &str) -> String {
    lazy_static! {
        static ref SIDE_MARKER: Regex = Regex::new(r"(?i)\s*(LH|RH)$|^(LH|RH)\s*").unwrap();
    }
    SIDE_MARKER.replacen(name, 1, "").trim().to_string()
}
