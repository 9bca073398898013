//! # Validation Module
//!
//! Input parsing and validation for the capture steps.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Field input (keystroke)                                      │
//! │  ├── parse_amount / parse_quantity: raw text → typed value             │
//! │  └── Rejects garbage immediately, draft stays unchanged                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Step advance                                                 │
//! │  ├── validate_name / validate_quantity / validate_amount               │
//! │  └── Wizard stays on the step and shows the message inline             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger math                                                  │
//! │  └── compute() rejects negatives with CoreError::InvalidInput          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{parse_amount, parse_quantity};
//!
//! let price = parse_amount("price", "₦35,000").unwrap();
//! assert_eq!(price.minor(), 3_500_000);
//!
//! let qty = parse_quantity("quantity", "2.5").unwrap();
//! assert_eq!(qty.to_string(), "2.5");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{Money, MINOR_PER_MAJOR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Decimal places accepted in a typed amount.
pub const MAX_AMOUNT_DECIMALS: u32 = 2;

/// Decimal places accepted in a typed quantity.
pub const MAX_QUANTITY_DECIMALS: u32 = 6;

const CURRENCY_PREFIXES: [&str; 4] = ["₦", "NGN", "N", "$"];

// =============================================================================
// String Validators
// =============================================================================

/// Validates a free-text name (customer, service, expense).
///
/// ## Rules
/// - Trimmed before checking
/// - Must not be empty
/// - Must be at most `max_len` characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_name(field: &str, raw: &str, max_len: usize) -> ValidationResult<String> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > max_len {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: max_len,
        });
    }

    Ok(name.to_string())
}

/// Validates a fixed-length numeric code (PIN, OTP).
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_digit_code;
///
/// assert!(validate_digit_code("pin", "1234", 4).is_ok());
/// assert!(validate_digit_code("pin", "12", 4).is_err());
/// assert!(validate_digit_code("pin", "12a4", 4).is_err());
/// ```
pub fn validate_digit_code(field: &str, raw: &str, len: usize) -> ValidationResult<()> {
    let code = raw.trim();

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain digits only".to_string(),
        });
    }

    let actual = code.len();
    if actual != len {
        return Err(ValidationError::IncompleteCode {
            field: field.to_string(),
            expected: len,
            actual,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Parsers
// =============================================================================

/// Parses a typed amount into Money.
///
/// ## Rules
/// - Optional leading `-` and optional currency prefix (`₦`, `NGN`, `N`, `$`)
/// - No other sign: `"--5"`, `"+5"` and `"₦-5"` are rejected
/// - Thousands separators `,` `_` and spaces are ignored
/// - At most 2 decimal places
///
/// A negative amount parses successfully; whether it is allowed is decided
/// by the step validator or the ledger calculator, not the parser.
pub fn parse_amount(field: &str, raw: &str) -> ValidationResult<Money> {
    let value = parse_decimal(field, raw, true)?;

    if value.normalize().scale() > MAX_AMOUNT_DECIMALS {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("at most {} decimal places", MAX_AMOUNT_DECIMALS),
        });
    }

    value
        .checked_mul(Decimal::from(MINOR_PER_MAJOR))
        .and_then(|minor| minor.to_i64())
        .map(Money::from_minor)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "amount is too large".to_string(),
        })
}

/// Parses a typed quantity. Fractions are allowed ("2.5" cups).
pub fn parse_quantity(field: &str, raw: &str) -> ValidationResult<Decimal> {
    let value = parse_decimal(field, raw, false)?;

    if value.normalize().scale() > MAX_QUANTITY_DECIMALS {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("at most {} decimal places", MAX_QUANTITY_DECIMALS),
        });
    }

    Ok(value.normalize())
}

fn parse_decimal(field: &str, raw: &str, allow_currency: bool) -> ValidationResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    let rest = if allow_currency {
        CURRENCY_PREFIXES
            .iter()
            .find_map(|prefix| rest.strip_prefix(prefix))
            .unwrap_or(rest)
    } else {
        rest
    };

    let digits: String = rest
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();

    // the only sign allowed is the one stripped above
    if digits.starts_with(|c| c == '-' || c == '+') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "misplaced sign".to_string(),
        });
    }

    let value = Decimal::from_str(&digits).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a number".to_string(),
    })?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity before advancing past the quantity step.
///
/// ## Rules
/// - Must be > 0
/// - Must not exceed `max`
pub fn validate_quantity(field: &str, quantity: Decimal, max: Decimal) -> ValidationResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if quantity > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: max.normalize().to_string(),
        });
    }

    Ok(())
}

/// Validates a price or expense amount before advancing.
///
/// ## Rules
/// - Must be > 0
/// - Must not exceed `max`
pub fn validate_amount(field: &str, amount: Money, max: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if amount > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: max.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("customer name", "  Ada  ", 50).unwrap(), "Ada");
        assert!(matches!(
            validate_name("customer name", "   ", 50),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_name("customer name", &"A".repeat(51), 50),
            Err(ValidationError::TooLong { max: 50, .. })
        ));
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("price", "200").unwrap(), Money::from_major(200));
        assert_eq!(parse_amount("price", "₦35,000").unwrap(), Money::from_major(35_000));
        assert_eq!(parse_amount("price", "N 1 200.50").unwrap(), Money::from_minor(120_050));
        assert_eq!(parse_amount("price", "1200.500").unwrap(), Money::from_minor(120_050));
        assert_eq!(parse_amount("price", "-50").unwrap(), Money::from_major(-50));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(matches!(
            parse_amount("price", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_amount("price", "abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_amount("price", "1.005"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_amount_single_leading_sign() {
        for raw in ["--5", "₦-5", "- -5", "+5", "-+5", "N -5"] {
            assert!(
                matches!(parse_amount("price", raw), Err(ValidationError::InvalidFormat { .. })),
                "{raw:?} should be rejected"
            );
        }
        assert_eq!(parse_amount("price", "-5").unwrap(), Money::from_major(-5));
        assert_eq!(parse_amount("price", "-₦5").unwrap(), Money::from_major(-5));
        assert!(parse_quantity("quantity", "--5").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("quantity", "10").unwrap(), Decimal::from(10));
        assert_eq!(parse_quantity("quantity", "2.50").unwrap(), Decimal::new(25, 1));
        assert_eq!(parse_quantity("quantity", "1,000").unwrap(), Decimal::from(1000));
        assert!(parse_quantity("quantity", "₦5").is_err());
        assert!(parse_quantity("quantity", "0.0000001").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        let max = Decimal::from(1000);
        assert!(validate_quantity("quantity", Decimal::new(25, 1), max).is_ok());
        assert!(matches!(
            validate_quantity("quantity", Decimal::ZERO, max),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_quantity("quantity", Decimal::from(-1), max).is_err());
        assert!(matches!(
            validate_quantity("quantity", Decimal::from(1001), max),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_amount() {
        let max = Money::from_major(1_000_000);
        assert!(validate_amount("price", Money::from_minor(1), max).is_ok());
        assert_eq!(
            validate_amount("price", Money::zero(), max).unwrap_err().to_string(),
            "price must be > 0"
        );
        assert!(validate_amount("price", Money::from_major(1_000_001), max).is_err());
    }

    #[test]
    fn test_validate_digit_code() {
        assert!(validate_digit_code("pin", "0042", 4).is_ok());
        assert!(matches!(
            validate_digit_code("pin", "004", 4),
            Err(ValidationError::IncompleteCode {
                expected: 4,
                actual: 3,
                ..
            })
        ));
        assert!(matches!(
            validate_digit_code("pin", "00x2", 4),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
