//! Keyword tokenization
//!
//! Replaces a fixed set of SQL keywords with bracketed markers that are
//! never encrypted, so the obfuscated form keeps a recognizable spine
//! while everything else becomes ciphertext.
//!
//! Replacement is an ASCII-case-insensitive **substring** match, not a
//! word-boundary match: an identifier that merely contains a keyword
//! (e.g. a column named `FROMAGE`) is partially replaced. Compatibility
//! with the established wire format requires keeping this behavior.
//! Detokenization restores the uppercase canonical keyword; original
//! casing is not recoverable.

/// Keyword/marker table, two-word phrases first so they are consumed
/// before any single-word pass could match inside them
pub const KEYWORD_MARKERS: &[(&str, &str)] = &[
    ("GROUP BY", "##GRP##"),
    ("ORDER BY", "##ORD##"),
    ("SELECT", "##SEL##"),
    ("INSERT", "##INS##"),
    ("UPDATE", "##UPD##"),
    ("DELETE", "##DEL##"),
    ("FROM", "##FRM##"),
    ("WHERE", "##WHR##"),
    ("JOIN", "##JIN##"),
];

/// Replace every recognized keyword with its marker
pub fn tokenize(sql: &str) -> String {
    let mut result = sql.to_string();
    for (keyword, marker) in KEYWORD_MARKERS {
        result = replace_all_ignore_case(&result, keyword, marker);
    }
    result
}

/// Map a marker back to its uppercase canonical keyword
pub fn marker_to_keyword(piece: &str) -> Option<&'static str> {
    KEYWORD_MARKERS
        .iter()
        .find(|(_, marker)| *marker == piece)
        .map(|(keyword, _)| *keyword)
}

/// Whether a piece is exactly one of the fixed markers
pub fn is_marker(piece: &str) -> bool {
    KEYWORD_MARKERS.iter().any(|(_, marker)| *marker == piece)
}

/// ASCII-case-insensitive substring replacement
///
/// The needle is ASCII, so every matched region is ASCII and splicing at
/// its byte boundaries cannot split a multi-byte character.
fn replace_all_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    let bytes = haystack.as_bytes();
    let pattern = needle.as_bytes();
    let mut result = String::with_capacity(haystack.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes.len() - i >= pattern.len() && bytes[i..i + pattern.len()].eq_ignore_ascii_case(pattern)
        {
            result.push_str(replacement);
            i += pattern.len();
        } else if let Some(c) = haystack[i..].chars().next() {
            result.push(c);
            i += c.len_utf8();
        } else {
            break;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic_query() {
        assert_eq!(
            tokenize("SELECT * FROM Customers WHERE CustomerID = :ID"),
            "##SEL## * ##FRM## Customers ##WHR## CustomerID = :ID"
        );
    }

    #[test]
    fn test_tokenize_is_case_insensitive() {
        assert_eq!(
            tokenize("select * from Customers where Active = 1"),
            "##SEL## * ##FRM## Customers ##WHR## Active = 1"
        );
        assert_eq!(tokenize("SeLeCt 1"), "##SEL## 1");
    }

    #[test]
    fn test_tokenize_two_word_phrases() {
        assert_eq!(
            tokenize("SELECT a FROM t GROUP BY a ORDER BY a"),
            "##SEL## a ##FRM## t ##GRP## a ##ORD## a"
        );
    }

    #[test]
    fn test_tokenize_all_keywords() {
        assert_eq!(tokenize("INSERT x"), "##INS## x");
        assert_eq!(tokenize("UPDATE x"), "##UPD## x");
        assert_eq!(tokenize("DELETE x"), "##DEL## x");
        assert_eq!(tokenize("JOIN x"), "##JIN## x");
    }

    #[test]
    fn test_substring_matching_inside_identifiers() {
        // Not word-boundary aware: FROMAGE loses its FROM prefix. This
        // is the established behavior, kept for format compatibility.
        assert_eq!(tokenize("SELECT FROMAGE"), "##SEL## ##FRM##AGE");
    }

    #[test]
    fn test_marker_round_trip() {
        for (keyword, marker) in KEYWORD_MARKERS {
            assert!(is_marker(marker));
            assert_eq!(marker_to_keyword(marker), Some(*keyword));
        }
        assert!(!is_marker("##XXX##"));
        assert!(!is_marker("SELECT"));
        assert_eq!(marker_to_keyword("##XXX##"), None);
    }

    #[test]
    fn test_non_ascii_text_survives() {
        assert_eq!(
            tokenize("SELECT nom FROM Fromages_Français"),
            "##SEL## nom ##FRM## ##FRM##ages_Français"
        );
    }
}
