use crate::domain::model::{ParsedItem, Position, Side, UNKNOWN_PRODUCT};
use lazy_static::lazy_static;
use regex::Regex;

/// 품목명에서 토큰 단위로 제거되는 방향/위치 지시어. 긴 형태가 먼저 온다.
const DIRECTION_KEYWORDS: &[&str] = &[
    "조수대", "운전석", "전방", "후방", "조", "운", "전", "후", "lh", "rh", "l", "r",
];

/// 주문서 전체 텍스트를 파싱한다. 줄바꿈 또는 소수점이 아닌 마침표로 라인을
/// 나누고, 품목명이 생략된 라인은 직전 라인의 품목명을 이어받는다.
pub fn parse_order_text(text: &str) -> Vec<ParsedItem> {
    let mut results = Vec::new();
    let mut last_product: Option<String> = None;

    for candidate in split_candidates(text) {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }

        let mut parsed = parse_order_line(candidate);
        for item in &mut parsed {
            if item.product == UNKNOWN_PRODUCT {
                if let Some(prev) = &last_product {
                    item.product = prev.clone();
                }
            } else {
                last_product = Some(item.product.clone());
            }
        }
        results.extend(parsed);
    }

    results
}

/// 한 라인을 0~2개의 항목으로 파싱한다. 수량을 찾지 못한 라인은 조용히
/// 버려진다.
pub fn parse_order_line(line: &str) -> Vec<ParsedItem> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    // 후방 표기가 전방 표기보다 우선한다
    let position = if trimmed.contains('후') {
        Position::Rear
    } else {
        Position::Front
    };
    let side = detect_side(trimmed);

    let Some((quantity, matched_qty)) = extract_quantity(trimmed) else {
        return Vec::new();
    };

    let product = extract_product(trimmed, &matched_qty);
    let original = trimmed.to_string();

    let mut items = Vec::new();
    match quantity {
        Quantity::Both { lh, rh } => {
            if lh > 0 {
                items.push(ParsedItem {
                    original: original.clone(),
                    product: product.clone(),
                    position,
                    side: Side::LH,
                    quantity: lh,
                });
            }
            if rh > 0 {
                items.push(ParsedItem {
                    original,
                    product,
                    position,
                    side: Side::RH,
                    quantity: rh,
                });
            }
        }
        Quantity::Single(qty) if qty > 0 => {
            items.push(ParsedItem {
                original,
                product,
                position,
                side: side.unwrap_or(Side::RH),
                quantity: qty,
            });
        }
        Quantity::Single(_) => {}
    }

    items
}

enum Quantity {
    /// 좌우 한 쌍. `N대분`은 양쪽 동일 수량, `N/M`은 LH=N, RH=M.
    Both { lh: u32, rh: u32 },
    Single(u32),
}

fn extract_quantity(line: &str) -> Option<(Quantity, String)> {
    lazy_static! {
        static ref SET_QTY: Regex = Regex::new(r"(\d+)\s*대분").unwrap();
        static ref PAIR_QTY: Regex = Regex::new(r"(\d+)\s*[/.]\s*(\d+)").unwrap();
        static ref UNIT_QTY: Regex = Regex::new(r"(?i)(\d+)\s*(개|ea)(?:\s|$)").unwrap();
    }

    if let Some(caps) = SET_QTY.captures(line) {
        let qty = caps[1].parse().unwrap_or(0);
        return Some((Quantity::Both { lh: qty, rh: qty }, caps[0].to_string()));
    }
    if let Some(caps) = PAIR_QTY.captures(line) {
        let lh = caps[1].parse().unwrap_or(0);
        let rh = caps[2].parse().unwrap_or(0);
        return Some((Quantity::Both { lh, rh }, caps[0].to_string()));
    }
    if let Some(caps) = UNIT_QTY.captures(line) {
        let qty = caps[1].parse().unwrap_or(0);
        return Some((Quantity::Single(qty), caps[0].to_string()));
    }

    last_standalone_number(line).map(|(qty, span)| (Quantity::Single(qty), span.to_string()))
}

fn detect_side(line: &str) -> Option<Side> {
    lazy_static! {
        // ASCII 단어 경계라서 숫자에 붙은 l/r은 토큰으로 보지 않는다
        static ref R_TOKEN: Regex = Regex::new(r"(?-u:\b)r(?-u:\b)").unwrap();
        static ref L_TOKEN: Regex = Regex::new(r"(?-u:\b)l(?-u:\b)").unwrap();
    }

    let lower = line.to_lowercase();
    if lower.contains("조수대") || lower.contains('조') || R_TOKEN.is_match(&lower) {
        Some(Side::RH)
    } else if lower.contains("운전석") || lower.contains('운') || L_TOKEN.is_match(&lower) {
        Some(Side::LH)
    } else {
        None
    }
}

/// 단위 표기가 없을 때의 수량 후보: 한글 음절이 바로 뒤따르지 않는 마지막
/// 숫자열. 공백이 뒤따르면 제거 범위에 그 공백까지 포함한다.
fn last_standalone_number(line: &str) -> Option<(u32, &str)> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut best: Option<(usize, usize, usize)> = None; // (start, digits_end, span_end)

    let mut i = 0;
    while i < chars.len() {
        if !chars[i].1.is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = chars[i].0;
        let mut j = i;
        while j + 1 < chars.len() && chars[j + 1].1.is_ascii_digit() {
            j += 1;
        }
        let digits_end = chars[j].0 + 1;
        match chars.get(j + 1) {
            None => best = Some((start, digits_end, digits_end)),
            Some(&(next_at, next)) if next.is_whitespace() => {
                best = Some((start, digits_end, next_at + next.len_utf8()));
            }
            Some(&(_, next)) if !is_hangul_syllable(next) => {
                best = Some((start, digits_end, digits_end));
            }
            _ => {}
        }
        i = j + 1;
    }

    best.and_then(|(start, digits_end, span_end)| {
        let qty = line[start..digits_end].parse().ok()?;
        Some((qty, &line[start..span_end]))
    })
}

fn extract_product(line: &str, matched_qty: &str) -> String {
    let mut product = line.replacen(matched_qty, "", 1).trim().to_string();
    for keyword in DIRECTION_KEYWORDS {
        product = strip_keyword_token(&product, keyword);
    }
    let product = clear_separator_periods(&product);
    let product: String = product
        .chars()
        .map(|c| if matches!(c, '/' | '(' | ')') { ' ' } else { c })
        .collect();
    let product = product.split_whitespace().collect::<Vec<_>>().join(" ");

    if product.is_empty() {
        UNKNOWN_PRODUCT.to_string()
    } else {
        product
    }
}

/// 키워드를 단어 경계 기준으로 제거한다. `그스타후`처럼 긴 단어에 포함된
/// 키워드는 남긴다.
fn strip_keyword_token(text: &str, keyword: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let kw: Vec<char> = keyword.chars().collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        let end = i + kw.len();
        let matches_kw = end <= chars.len()
            && chars[i..end]
                .iter()
                .zip(&kw)
                .all(|(c, k)| c.to_ascii_lowercase() == *k)
            && (i == 0 || !is_name_char(chars[i - 1]))
            && (end == chars.len() || !is_name_char(chars[end]));
        if matches_kw {
            i = end;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

/// 마침표는 양쪽이 모두 숫자일 때만 남긴다 (소수점 보존).
fn clear_separator_periods(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if c != '.' {
                return c;
            }
            let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let next_digit = i + 1 < chars.len() && chars[i + 1].is_ascii_digit();
            if prev_digit && next_digit {
                '.'
            } else {
                ' '
            }
        })
        .collect()
}

/// 줄바꿈, 그리고 양쪽이 숫자가 아닌 마침표에서 라인을 나눈다.
fn split_candidates(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut parts = Vec::new();
    let mut start = 0;

    for (i, &(at, c)) in chars.iter().enumerate() {
        let is_separator = match c {
            '\n' => true,
            '.' => {
                let prev_digit = i > 0 && chars[i - 1].1.is_ascii_digit();
                let next_digit = i + 1 < chars.len() && chars[i + 1].1.is_ascii_digit();
                !(prev_digit && next_digit)
            }
            _ => false,
        };
        if is_separator {
            parts.push(&text[start..at]);
            start = at + c.len_utf8();
        }
    }
    parts.push(&text[start..]);

    parts
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || is_hangul_syllable(c)
}

fn is_hangul_syllable(c: char) -> bool {
    ('가'..='힣').contains(&c)
}
