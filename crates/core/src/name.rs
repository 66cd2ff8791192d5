//! Taker name handling.
//!
//! The normalized form is the only grouping key used by aggregation, so
//! `"山田 太郎"`, `" 山田太郎 "` and `"山田　太郎"` all count as the same taker.

/// Canonical grouping key for a taker name.
///
/// Trims the ends, then drops every remaining whitespace character, which
/// covers ASCII spaces, tabs and the ideographic space (U+3000). Case and the
/// width of non-space characters are left untouched.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.trim().chars().filter(|c| !c.is_whitespace()).collect()
}

/// Name as shown back to the taker: ends trimmed, inner spacing kept.
#[must_use]
pub fn display_name(raw: &str) -> &str {
    raw.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_variants_share_a_key() {
        assert_eq!(normalize_name(" 山田 太郎 "), "山田太郎");
        assert_eq!(normalize_name("山田太郎"), "山田太郎");
        assert_eq!(normalize_name("山田\u{3000}太郎"), "山田太郎");
        assert_eq!(normalize_name("\u{3000}山田\t太郎\u{3000}"), "山田太郎");
    }

    #[test]
    fn blank_input_normalizes_to_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("\u{3000}\u{3000}"), "");
    }

    #[test]
    fn normalization_is_case_and_width_sensitive() {
        assert_ne!(normalize_name("Alice"), normalize_name("alice"));
        assert_ne!(normalize_name("ＡＢ"), normalize_name("AB"));
    }

    #[test]
    fn display_name_keeps_inner_spacing() {
        assert_eq!(display_name("  山田 太郎  "), "山田 太郎");
    }
}
