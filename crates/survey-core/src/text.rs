//! Text normalization for raw survey cells.
//!
//! Every recoding function sees values through [`normalize`] first, so the
//! many spellings of "no answer" collapse into one absent state before any
//! rule is applied.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Literal strings treated as blank after whitespace collapsing.
/// The empty string and pure whitespace are covered by the collapse itself.
const BLANK_LITERALS: &[&str] = &["N/A", "NA", "Na", "n/a", "None", "NONE", "none"];

/// Canonicalize one raw cell value.
///
/// Trims, collapses internal whitespace runs to a single space, applies
/// Unicode canonical decomposition and strips combining marks (so "é"
/// becomes "e"), folds typographic apostrophes to `'`, and returns `None`
/// when the result is empty or one of the fixed blank literals. Idempotent:
/// `normalize(&normalize(x)?) == normalize(x)`.
pub fn normalize(raw: &str) -> Option<String> {
    let folded: String = raw
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .map(|ch| match ch {
            // Form exports carry curly apostrophes; rule tables use ASCII.
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect();
    let mut collapsed = String::with_capacity(folded.len());
    for part in folded.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(part);
    }
    if collapsed.is_empty() || BLANK_LITERALS.contains(&collapsed.as_str()) {
        None
    } else {
        Some(collapsed)
    }
}

/// True when the value normalizes to the absent state.
pub fn is_blank(raw: &str) -> bool {
    normalize(raw).is_none()
}

/// True when the value contains letters and none of them are lowercase.
pub fn is_all_caps(value: &str) -> bool {
    let mut has_alpha = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            has_alpha = true;
            if ch.is_lowercase() {
                return false;
            }
        }
    }
    has_alpha
}

/// Title-case each whitespace-separated word.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (idx, word) in value.split_whitespace().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}

pub fn word_count(value: &str) -> usize {
    value.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize("  Data   Analyst \t "), Some("Data Analyst".into()));
    }

    #[test]
    fn strips_accents() {
        assert_eq!(normalize("Parañaque"), Some("Paranaque".into()));
        assert_eq!(normalize("café"), Some("cafe".into()));
    }

    #[test]
    fn blank_literals_map_to_absent() {
        for literal in ["", " ", "N/A", "NA", "Na", "n/a", "None", "NONE", "none"] {
            assert_eq!(normalize(literal), None, "literal {literal:?}");
        }
        assert_eq!(normalize("  N/A  "), None);
    }

    #[test]
    fn curly_apostrophes_fold_to_ascii() {
        assert_eq!(normalize("Don\u{2019}t know"), Some("Don't know".into()));
        assert_eq!(
            normalize("Haven\u{2018}t tried"),
            Some("Haven't tried".into())
        );
    }

    #[test]
    fn distinct_from_literal_none_text() {
        // "None at the moment" is a real answer, not a blank literal.
        assert_eq!(
            normalize("None at the moment"),
            Some("None at the moment".into())
        );
    }

    #[test]
    fn all_caps_detection() {
        assert!(is_all_caps("CATBALOGAN"));
        assert!(is_all_caps("QUEZON CITY"));
        assert!(!is_all_caps("Catbalogan"));
        assert!(!is_all_caps("1234"));
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("CATBALOGAN"), "Catbalogan");
        assert_eq!(title_case("quezon city"), "Quezon City");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in ".{0,80}") {
            let once = normalize(&raw);
            let twice = once.as_deref().and_then(normalize);
            prop_assert_eq!(once, twice);
        }
    }
}
