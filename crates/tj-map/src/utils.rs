//! Text helpers shared by the matchers.

/// Lowercases and replaces separators with spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\', ':', '(', ')'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keeps lowercase alphanumerics and `%`, so `R:R` and `r r` compare equal.
pub fn compact_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == '%')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Words of the normalized text.
pub(crate) fn tokens(raw: &str) -> Vec<String> {
    normalize_text(raw)
        .split(|c: char| !c.is_alphanumeric() && c != '%')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when the two texts share a word, or one word starts another word
/// and is at least three characters long.
pub(crate) fn shares_token(left: &[String], right: &[String]) -> bool {
    left.iter().any(|l| {
        right.iter().any(|r| {
            let (short, long) = if l.chars().count() <= r.chars().count() {
                (l, r)
            } else {
                (r, l)
            };
            short == long || (short.chars().count() >= 3 && long.starts_with(short.as_str()))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Trade_Date "), "trade date");
        assert_eq!(normalize_text("S / L"), "s l");
    }

    #[test]
    fn test_compact_key() {
        assert_eq!(compact_key("R:R"), "rr");
        assert_eq!(compact_key("Risk %"), "risk%");
        assert_eq!(compact_key("P&L"), "pl");
        assert_eq!(compact_key("Résultat"), "résultat");
    }

    #[test]
    fn test_shares_token() {
        let t = |s: &str| tokens(s);
        assert!(shares_token(&t("Dir"), &t("direction")));
        assert!(shares_token(&t("Trade Dt"), &t("trade date")));
        assert!(!shares_token(&t("Ticket"), &t("ticker")));
        assert!(!shares_token(&t("Column A"), &t("comment")));
    }
}
