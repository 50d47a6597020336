use log::warn;
use serde::{Deserialize, Serialize};

/// Outcome of coercing a raw extracted value into a number.
///
/// The prototypes this replaces used "try float, else null", which conflated
/// an empty cell with a label the model hallucinated. The three cases are
/// kept apart so the aggregator can log them differently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Number(f64),
    Unparseable,
    Absent,
}

impl NumericValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            NumericValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// Parse a monetary amount as it appears in extracted statement text.
///
/// Strips thousands separators and currency decoration, and treats
/// parenthesized amounts as negative: `"1,234.56"` → 1234.56,
/// `"(500)"` → -500.
pub fn parse_amount(raw: &str) -> NumericValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NumericValue::Absent;
    }

    let (body, parenthesized) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (&trimmed[1..trimmed.len() - 1], true)
    } else {
        (trimmed, false)
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' ' | '\u{a0}'))
        .collect();
    if cleaned.is_empty() {
        return NumericValue::Absent;
    }

    match cleaned.parse::<f64>() {
        Ok(value) if parenthesized => NumericValue::Number(-value.abs()),
        Ok(value) => NumericValue::Number(value),
        Err(_) => NumericValue::Unparseable,
    }
}

/// Coerce an arbitrary JSON leaf into a [`NumericValue`].
pub fn coerce(value: &serde_json::Value) -> NumericValue {
    match value {
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(v) => NumericValue::Number(v),
            None => NumericValue::Unparseable,
        },
        serde_json::Value::String(s) => parse_amount(s),
        serde_json::Value::Null => NumericValue::Absent,
        _ => NumericValue::Unparseable,
    }
}

/// Magnitude unit the source document reports its figures in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Magnitude {
    #[default]
    Units,
    Thousands,
    Millions,
}

impl Magnitude {
    pub fn factor(&self) -> f64 {
        match self {
            Magnitude::Units => 1.0,
            Magnitude::Thousands => 1_000.0,
            Magnitude::Millions => 1_000_000.0,
        }
    }

    /// Parse the scale word the model reports in the `Unidad` field.
    ///
    /// Accepts the Spanish and English words seen in real documents; an
    /// unrecognized label is treated as plain units with a warning.
    pub fn parse(label: &str) -> Magnitude {
        let normalized = label.trim().to_lowercase();
        if normalized.is_empty() {
            return Magnitude::Units;
        }
        if normalized.contains("millon") || normalized.contains("million") {
            return Magnitude::Millions;
        }
        if normalized.contains("miles") || normalized.contains("thousand") || normalized == "mil" {
            return Magnitude::Thousands;
        }
        if normalized.contains("unidad") || normalized.contains("unit") || normalized.contains("peso")
        {
            return Magnitude::Units;
        }
        warn!("Unrecognized magnitude label '{}'; assuming units", label);
        Magnitude::Units
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_amount_with_thousands_separators() {
        assert_eq!(parse_amount("1,234.56"), NumericValue::Number(1234.56));
        assert_eq!(parse_amount("12,345,678"), NumericValue::Number(12_345_678.0));
    }

    #[test]
    fn test_parse_amount_parenthesized_is_negative() {
        assert_eq!(parse_amount("(500)"), NumericValue::Number(-500.0));
        assert_eq!(parse_amount("(1,250.75)"), NumericValue::Number(-1250.75));
    }

    #[test]
    fn test_parse_amount_leading_minus() {
        assert_eq!(parse_amount("-42.5"), NumericValue::Number(-42.5));
    }

    #[test]
    fn test_parse_amount_currency_decoration() {
        assert_eq!(parse_amount("$ 1,000"), NumericValue::Number(1000.0));
    }

    #[test]
    fn test_parse_amount_unparseable() {
        assert_eq!(parse_amount("abc"), NumericValue::Unparseable);
        assert_eq!(parse_amount("N/A"), NumericValue::Unparseable);
    }

    #[test]
    fn test_parse_amount_absent() {
        assert_eq!(parse_amount(""), NumericValue::Absent);
        assert_eq!(parse_amount("   "), NumericValue::Absent);
    }

    #[test]
    fn test_coerce_json_leaves() {
        assert_eq!(coerce(&json!(1500)), NumericValue::Number(1500.0));
        assert_eq!(coerce(&json!("2,000")), NumericValue::Number(2000.0));
        assert_eq!(coerce(&json!(null)), NumericValue::Absent);
        assert_eq!(coerce(&json!(true)), NumericValue::Unparseable);
        assert_eq!(coerce(&json!(["1"])), NumericValue::Unparseable);
    }

    #[test]
    fn test_magnitude_parse() {
        assert_eq!(Magnitude::parse("miles de pesos"), Magnitude::Thousands);
        assert_eq!(Magnitude::parse("Millones"), Magnitude::Millions);
        assert_eq!(Magnitude::parse("millions of USD"), Magnitude::Millions);
        assert_eq!(Magnitude::parse("unidades"), Magnitude::Units);
        assert_eq!(Magnitude::parse(""), Magnitude::Units);
        assert_eq!(Magnitude::parse("furlongs"), Magnitude::Units);
    }

    #[test]
    fn test_magnitude_factor() {
        assert_eq!(Magnitude::Units.factor(), 1.0);
        assert_eq!(Magnitude::Thousands.factor(), 1_000.0);
        assert_eq!(Magnitude::Millions.factor(), 1_000_000.0);
    }
}
