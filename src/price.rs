use crate::error::{OrderBookError, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a limit price string into a non-negative `Decimal`.
///
/// Surrounding whitespace is ignored. Empty, malformed and negative inputs
/// are rejected with [`OrderBookError::InvalidPrice`].
///
/// ## Examples
///
/// ```
/// use limit_order_book::{parse_price, Decimal};
///
/// assert_eq!(parse_price("200.25").unwrap(), Decimal::new(20025, 2));
/// assert!(parse_price("-1.00").is_err());
/// assert!(parse_price("abc").is_err());
/// ```
pub fn parse_price(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let price = Decimal::from_str(trimmed)
        .map_err(|_| OrderBookError::InvalidPrice(raw.to_string()))?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err(OrderBookError::InvalidPrice(raw.to_string()));
    }

    // "-0" parses with its sign bit set
    Ok(if price.is_zero() { Decimal::ZERO } else { price })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_and_padded_prices() {
        assert_eq!(parse_price("100").unwrap(), Decimal::new(100, 0));
        assert_eq!(parse_price(" 99.99 ").unwrap(), Decimal::new(9999, 2));
        assert_eq!(parse_price("0.0001").unwrap(), Decimal::new(1, 4));
    }

    #[test]
    fn test_zero_is_valid() {
        assert_eq!(parse_price("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_price("-0.00").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_rejects_malformed_and_negative() {
        for raw in ["", "   ", "12.3.4", "1x", "ten", "-0.01", "-150"] {
            assert_eq!(
                parse_price(raw),
                Err(OrderBookError::InvalidPrice(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }
}
