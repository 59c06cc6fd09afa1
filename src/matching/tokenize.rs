//! Keyword tokenization and per-field relevance.

/// Split text into lowercase alphanumeric tokens.
///
/// Any run of non-alphanumeric characters is a separator. Duplicates are kept
/// in order; empty input yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_ascii_lowercase()
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(|term| term.to_string())
        .collect()
}

/// Fraction of `keywords` found inside the tokens of `field_text`.
///
/// A keyword matches when any field token contains it as a substring, so
/// `"cardi"` matches `"cardiology"`. Returns `0.0` for an empty field or an
/// empty keyword set.
pub fn field_score(field_text: &str, keywords: &[String]) -> f64 {
    if field_text.is_empty() || keywords.is_empty() {
        return 0.0;
    }

    let tokens = tokenize(field_text);
    if tokens.is_empty() {
        return 0.0;
    }

    let matched = keywords
        .iter()
        .filter(|keyword| tokens.iter().any(|token| token.contains(keyword.as_str())))
        .count();

    matched as f64 / keywords.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("Glioblastoma, IMMUNO-therapy (phase 2)"),
            vec!["glioblastoma", "immuno", "therapy", "phase", "2"]
        );
    }

    #[test]
    fn test_tokenize_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
        assert!(tokenize("--- ,,, !!").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_duplicates() {
        assert_eq!(tokenize("lung Lung LUNG"), vec!["lung", "lung", "lung"]);
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let inputs = [
            "Dr. Jane O'Neil, MD/PhD",
            "  multiple   spaces  ",
            "Ünïcode café mix 42",
            "",
        ];
        for input in inputs {
            let once = tokenize(input);
            let twice = tokenize(&once.join(" "));
            assert_eq!(once, twice, "input: {input:?}");
        }
    }

    #[test]
    fn test_field_score_substring_match() {
        let score = field_score("Cardiology and vascular medicine", &kw(&["cardi"]));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_field_score_is_recall_over_keywords() {
        let score = field_score("Lung cancer screening", &kw(&["lung", "breast", "screen", "mri"]));
        assert_eq!(score, 0.5);
    }

    #[test]
    fn test_field_score_empty_inputs() {
        assert_eq!(field_score("", &kw(&["lung"])), 0.0);
        assert_eq!(field_score("lung", &[]), 0.0);
        assert_eq!(field_score("   ", &kw(&["lung"])), 0.0);
    }

    #[test]
    fn test_field_score_bounds() {
        let fields = ["", "a", "alpha beta gamma", "alpha alpha alpha"];
        let keyword_sets = [kw(&["alpha"]), kw(&["alpha", "alpha"]), kw(&["x", "y", "z"])];
        for field in fields {
            for keywords in &keyword_sets {
                let score = field_score(field, keywords);
                assert!((0.0..=1.0).contains(&score), "{field:?} {keywords:?}");
            }
        }
    }
}
