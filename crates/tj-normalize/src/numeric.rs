//! Numeric normalization.

/// Symbols stripped before parsing.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '₿', '%'];

/// Parses a number written the way spreadsheets export it.
///
/// Handles currency symbols and codes, percent signs, thousands separators,
/// decimal commas and accounting-style negatives such as `(12.50)`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (negated, body) = match trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };
    let cleaned: String = body
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && !c.is_whitespace() && *c != '\'')
        .collect();
    let cleaned = cleaned.trim_matches(|c: char| c.is_ascii_alphabetic());
    if cleaned.is_empty() {
        return None;
    }
    let unified = unify_separators(cleaned)?;
    let value: f64 = unified.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negated { -value } else { value })
}

/// Rewrites thousands and decimal separators into a plain `1234.5` form.
fn unify_separators(value: &str) -> Option<String> {
    let commas = value.matches(',').count();
    let dots = value.matches('.').count();
    let unified = match (commas, dots) {
        (0, 0) => value.to_string(),
        (0, 1) => value.to_string(),
        (0, _) => value.replace('.', ""),
        (_, 0) if commas > 1 => value.replace(',', ""),
        (_, 0) => {
            let (before, after) = value.split_once(',')?;
            let digits_before = before.trim_start_matches(['-', '+']);
            let grouped = after.len() == 3
                && (1..=3).contains(&digits_before.len())
                && !digits_before.starts_with('0');
            if grouped {
                value.replace(',', "")
            } else {
                value.replace(',', ".")
            }
        }
        _ => {
            let last_comma = value.rfind(',')?;
            let last_dot = value.rfind('.')?;
            if last_comma > last_dot {
                value.replace('.', "").replace(',', ".")
            } else {
                value.replace(',', "")
            }
        }
    };
    Some(unified)
}

/// Parses a risk/reward value, accepting `1:2.5` notation as well as plain numbers.
pub fn parse_ratio(raw: &str) -> Option<f64> {
    if let Some((risk, reward)) = raw.split_once(':') {
        let risk = parse_number(risk)?;
        let reward = parse_number(reward)?;
        if risk == 0.0 {
            return None;
        }
        return Some(reward / risk);
    }
    parse_number(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("+2"), Some(2.0));
        assert_eq!(parse_number("  "), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_decorated_numbers() {
        assert_eq!(parse_number("$1,234.50"), Some(1234.5));
        assert_eq!(parse_number("1.234,50 €"), Some(1234.5));
        assert_eq!(parse_number("1%"), Some(1.0));
        assert_eq!(parse_number("(12.50)"), Some(-12.5));
        assert_eq!(parse_number("USD 100"), Some(100.0));
        assert_eq!(parse_number("2R"), Some(2.0));
        assert_eq!(parse_number("1'000"), Some(1000.0));
    }

    #[test]
    fn test_single_comma() {
        assert_eq!(parse_number("0,5"), Some(0.5));
        assert_eq!(parse_number("1,000"), Some(1000.0));
        assert_eq!(parse_number("12,75"), Some(12.75));
        assert_eq!(parse_number("1.000.000"), Some(1_000_000.0));
    }

    #[test]
    fn test_ratio() {
        assert_eq!(parse_ratio("1:2.5"), Some(2.5));
        assert_eq!(parse_ratio("2:3"), Some(1.5));
        assert_eq!(parse_ratio("3"), Some(3.0));
        assert_eq!(parse_ratio("0:2"), None);
    }
}
