//! Character policy shared by both identifier grammars
//!
//! Component values are restricted to ASCII letters, digits, `_`, `.` and `-`.
//! The name component additionally allows `:`. HTML ids allow ASCII letters,
//! digits, `_` and `-`.

use once_cell::sync::Lazy;
use regex::Regex;

static INVALID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid invalid-chars pattern"));

static INVALID_CHARS_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.:-]").expect("valid invalid-name-chars pattern"));

static INVALID_HTML_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid invalid-html-chars pattern"));

static UNDERSCORE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_+").expect("valid underscore-run pattern"));

fn clean_with(value: &str, invalid: &Regex) -> String {
    let replaced = invalid.replace_all(value, "_");
    UNDERSCORE_RUN.replace_all(&replaced, "_").into_owned()
}

/// Replace characters that are illegal in a location component with `_`,
/// collapsing runs of underscores.
pub fn clean(value: &str) -> String {
    clean_with(value, &INVALID_CHARS)
}

/// Like [`clean`] but leaves existing runs of underscores intact.
///
/// Asset names such as video ids can legitimately contain repeated
/// underscores, and collapsing them would break the match.
pub fn clean_keeping_underscores(value: &str) -> String {
    INVALID_CHARS.replace_all(value, "_").into_owned()
}

/// Clean a value for use as a location name, where `:` is allowed.
pub fn clean_for_url_name(value: &str) -> String {
    clean_with(value, &INVALID_CHARS_NAME)
}

/// Clean a value for use in html ids, classes and urls.
pub fn clean_for_html(value: &str) -> String {
    clean_with(value, &INVALID_HTML_CHARS)
}

pub(crate) fn has_invalid_chars(value: &str) -> bool {
    INVALID_CHARS.is_match(value)
}

pub(crate) fn has_invalid_name_chars(value: &str) -> bool {
    INVALID_CHARS_NAME.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_substitutions() {
        assert_eq!(clean("Week 1: Intro!!"), "Week_1_Intro_");
        assert_eq!(clean("a__b"), "a_b");
    }

    #[test]
    fn test_clean_keeping_underscores() {
        assert_eq!(clean_keeping_underscores("vid__id x"), "vid__id_x");
    }

    #[test]
    fn test_clean_for_url_name_keeps_colons() {
        assert_eq!(clean_for_url_name("ns:item one"), "ns:item_one");
    }

    #[test]
    fn test_clean_for_html() {
        assert_eq!(clean_for_html("i4x-MITx-6.002x-problem-p1"), "i4x-MITx-6_002x-problem-p1");
        assert_eq!(clean_for_html("a.:b"), "a_b");
        assert_eq!(clean_for_html("Café"), "Caf_");
        assert_eq!(clean("naïve name"), "na_ve_name");
    }

    #[test]
    fn test_invalid_char_checks() {
        assert!(has_invalid_chars("name!bad"));
        assert!(has_invalid_chars("with:colon"));
        assert!(!has_invalid_name_chars("with:colon"));
        assert!(!has_invalid_chars("Week_1.v2-final"));
        assert!(has_invalid_chars("MITéx"));
        assert!(has_invalid_name_chars("naïve"));
    }
}
