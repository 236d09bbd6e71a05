use crate::domain::model::{MatchStatus, MatchedLine, Position, SessionStats, Side};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct LineKey {
    line_number: usize,
    side: Side,
    position: Position,
}

/// 한 번의 변환 세션. `(라인 번호, 방향, 위치)` 키로 결과를 모으고, 같은
/// 키로 다시 쓰면 이전 결과를 덮어쓴다 (사용자 수정 반영).
#[derive(Debug, Default)]
pub struct ConversionSession {
    original_text: String,
    entries: BTreeMap<LineKey, MatchedLine>,
}

impl ConversionSession {
    pub fn new(original_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn upsert(&mut self, line: MatchedLine) {
        let key = LineKey {
            line_number: line.line_number,
            side: line.side,
            position: line.position,
        };
        self.entries.insert(key, line);
    }

    /// 라인 번호 오름차순(같은 라인은 LH 먼저)으로 정렬된 결과.
    pub fn finalize(&self) -> Vec<&MatchedLine> {
        self.entries.values().collect()
    }

    /// 엑셀 붙여넣기용 projection: 코드 TAB 품목명 TAB 수량.
    /// 확정/수동 매칭된 행만 내보낸다.
    pub fn to_tsv(&self) -> String {
        self.entries
            .values()
            .filter(|line| {
                matches!(line.status, MatchStatus::Confirmed | MatchStatus::Edited)
            })
            .map(|line| {
                format!(
                    "{}\t{}\t{}",
                    line.matched_code, line.matched_name, line.quantity
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn stats(&self) -> SessionStats {
        let manually_edited = self.entries.values().filter(|l| l.user_edited).count();
        SessionStats {
            total_items: self.entries.len(),
            auto_matched: self.entries.len() - manually_edited,
            manually_edited,
        }
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(
        line_number: usize,
        side: Side,
        position: Position,
        code: &str,
        status: MatchStatus,
        user_edited: bool,
    ) -> MatchedLine {
        MatchedLine {
            line_number,
            original_line: "포터2 2대분".to_string(),
            parsed_product: "포터2".to_string(),
            matched_code: code.to_string(),
            matched_name: format!("포터2 {}", side),
            position,
            side,
            quantity: 2,
            confidence: if status == MatchStatus::Failed { 0 } else { 100 },
            status,
            user_edited,
        }
    }

    #[test]
    fn test_upsert_replaces_same_key() {
        let mut session = ConversionSession::new("포터2 2대분");
        session.upsert(line(1, Side::LH, Position::Front, "11111", MatchStatus::Confirmed, false));
        session.upsert(line(1, Side::LH, Position::Front, "22222", MatchStatus::Edited, true));

        assert_eq!(session.len(), 1);
        assert_eq!(session.finalize()[0].matched_code, "22222");
        assert_eq!(session.original_text(), "포터2 2대분");
        assert!(!session.is_empty());
    }

    #[test]
    fn test_same_line_different_sides_are_distinct() {
        let mut session = ConversionSession::new("포터2 2대분");
        session.upsert(line(1, Side::RH, Position::Front, "16212", MatchStatus::Confirmed, false));
        session.upsert(line(1, Side::LH, Position::Front, "16211", MatchStatus::Confirmed, false));

        assert_eq!(session.len(), 2);
        // LH가 먼저 온다
        let ordered = session.finalize();
        assert_eq!(ordered[0].side, Side::LH);
        assert_eq!(ordered[1].side, Side::RH);
    }

    #[test]
    fn test_finalize_sorted_by_line_number() {
        let mut session = ConversionSession::new("");
        session.upsert(line(3, Side::RH, Position::Front, "c", MatchStatus::Confirmed, false));
        session.upsert(line(1, Side::RH, Position::Front, "a", MatchStatus::Confirmed, false));
        session.upsert(line(2, Side::RH, Position::Rear, "b", MatchStatus::Confirmed, false));

        let codes: Vec<&str> = session
            .finalize()
            .iter()
            .map(|l| l.matched_code.as_str())
            .collect();
        assert_eq!(codes, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tsv_exports_only_confirmed_and_edited() {
        let mut session = ConversionSession::new("");
        session.upsert(line(1, Side::LH, Position::Front, "16211", MatchStatus::Confirmed, false));
        session.upsert(line(2, Side::RH, Position::Front, "16212", MatchStatus::Edited, true));
        session.upsert(line(3, Side::RH, Position::Front, "", MatchStatus::Failed, false));
        session.upsert(line(4, Side::RH, Position::Front, "14030", MatchStatus::Pending, false));

        let tsv = session.to_tsv();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "16211\t포터2 LH\t2");
        assert_eq!(lines[1], "16212\t포터2 RH\t2");
    }

    #[test]
    fn test_stats_counts_user_edits() {
        let mut session = ConversionSession::new("");
        session.upsert(line(1, Side::LH, Position::Front, "a", MatchStatus::Confirmed, false));
        session.upsert(line(2, Side::RH, Position::Front, "b", MatchStatus::Edited, true));

        let stats = session.stats();
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.auto_matched, 1);
        assert_eq!(stats.manually_edited, 1);
    }
}
