/// 두 문자열의 편집 거리 기반 유사도. 긴 쪽 길이를 기준으로
/// `(max_len - distance) / max_len`을 돌려준다. 둘 다 비어 있으면 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.to_lowercase().chars().collect();
    let b_chars: Vec<char> = b.to_lowercase().chars().collect();
    let (longer, shorter) = if a_chars.len() >= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if longer.is_empty() {
        return 1.0;
    }

    let distance = levenshtein(&longer, &shorter);
    (longer.len() - distance) as f64 / longer.len() as f64
}

/// 매칭 비교용 키 정규화: 공백, 괄호, 하이픈, 언더스코어 제거 후 소문자화.
pub fn clean_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '[' | ']' | '-' | '_'))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=a.len()).collect();
    let mut curr = vec![0usize; a.len() + 1];

    for (i, bc) in b.iter().enumerate() {
        curr[0] = i + 1;
        for (j, ac) in a.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost)
                .min(curr[j] + 1)
                .min(prev[j + 1] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[a.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(similarity("포터2", "포터2"), 1.0);
        assert_eq!(similarity("elantra", "elantra"), 1.0);
    }

    #[test]
    fn test_both_empty_score_one() {
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_empty_against_non_empty_scores_zero() {
        assert_eq!(similarity("", "포터2"), 0.0);
    }

    #[test]
    fn test_case_invariant() {
        assert_eq!(similarity("ABC", "abc"), 1.0);
        assert_eq!(similarity("Hd", "hD"), 1.0);
    }

    #[test]
    fn test_known_distances() {
        // kitten -> sitting: 편집 거리 3, 기준 길이 7
        assert!((similarity("kitten", "sitting") - 4.0 / 7.0).abs() < 1e-9);
        // 한 글자 치환, 길이 7
        assert!((similarity("그랜드스타렉스", "그랜드스타랙스") - 6.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_by_construction() {
        assert_eq!(similarity("포터", "포터2"), similarity("포터2", "포터"));
    }

    #[test]
    fn test_clean_key_strips_separators() {
        assert_eq!(clean_key("그랜드스타렉스(후) LH"), "그랜드스타렉스후lh");
        assert_eq!(clean_key("K5 [2020] - GT_Line"), "k52020gtline");
    }
}
