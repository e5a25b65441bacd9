use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

/// Rejects empty and whitespace-only strings
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be empty")));
    }
    Ok(())
}

/// Rejects non-positive amounts and anything the `NUMERIC(12, 2)` price
/// column would round or overflow.
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("non_positive")
            .with_message(Cow::Borrowed("price must be greater than zero")));
    }
    if value.normalize().scale() > 2 {
        return Err(ValidationError::new("precision")
            .with_message(Cow::Borrowed("price must have at most two decimal places")));
    }
    // NUMERIC(12, 2) upper bound
    if *value > Decimal::new(999_999_999_999, 2) {
        return Err(ValidationError::new("range")
            .with_message(Cow::Borrowed("price must not exceed 9999999999.99")));
    }
    Ok(())
}

/// Build an ILIKE pattern matching `needle` anywhere, with LIKE wildcards
/// in the input treated as literal characters.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Earbuds").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_price_must_be_positive() {
        assert!(validate_price(&dec!(0.01)).is_ok());
        assert!(validate_price(&dec!(0)).is_err());
        assert!(validate_price(&dec!(-5)).is_err());
    }

    #[test]
    fn test_price_must_fit_the_column() {
        assert!(validate_price(&dec!(49.99)).is_ok());
        assert!(validate_price(&dec!(49.990)).is_ok());
        assert!(validate_price(&dec!(9999999999.99)).is_ok());

        let err = validate_price(&dec!(0.004)).unwrap_err();
        assert_eq!(err.code, "precision");
        assert_eq!(validate_price(&dec!(49.999)).unwrap_err().code, "precision");
        assert_eq!(validate_price(&dec!(100000000000)).unwrap_err().code, "range");
        assert_eq!(validate_price(&dec!(10000000000)).unwrap_err().code, "range");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("case"), "%case%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("usb_c"), "%usb\\_c%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
