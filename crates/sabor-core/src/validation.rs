//! # Validation Module
//!
//! Boundary validation for Sabor POS. Every inbound value is checked here
//! once, before any storage is touched, and turned into a typed value or a
//! [`ValidationError`] naming the field.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP request structs (serde)                                 │
//! │  └── Shape: numbers vs strings, missing fields                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Domain rules: positive ids, non-negative stock, price format      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── CHECK (stock_quantity >= 0), CHECK (price_cents >= 0)             │
//! │  └── UNIQUE barcode / login                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{DEFAULT_PAYMENT_TAG, MAX_NAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Trims and checks a required free-text field.
///
/// ## Example
/// ```rust
/// use sabor_core::validation::validate_required_text;
///
/// assert_eq!(validate_required_text("name", "  Kernel Burger ").unwrap(), "Kernel Burger");
/// assert!(validate_required_text("name", "   ").is_err());
/// ```
pub fn validate_required_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(value.to_string())
}

/// Validates a product display name.
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_required_text("name", name)
}

/// Validates a barcode.
///
/// Barcodes are opaque business keys; only blank values are rejected, and
/// surrounding whitespace (scanner padding) is removed.
pub fn validate_barcode(barcode: &str) -> ValidationResult<String> {
    let barcode = validate_required_text("barcode", barcode)?;

    if barcode.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(barcode)
}

/// Normalises the payment tag; blank or absent becomes the cash tag.
///
/// ## Example
/// ```rust
/// use sabor_core::validation::normalize_payment_tag;
///
/// assert_eq!(normalize_payment_tag(None).unwrap(), "Dinheiro");
/// assert_eq!(normalize_payment_tag(Some("  ")).unwrap(), "Dinheiro");
/// assert_eq!(normalize_payment_tag(Some(" Pix ")).unwrap(), "Pix");
/// ```
pub fn normalize_payment_tag(tag: Option<&str>) -> ValidationResult<String> {
    match tag.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PAYMENT_TAG.to_string()),
        Some(tag) => validate_required_text("paymentTag", tag),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Parses a unit price. Negative prices are rejected.
///
/// ## Example
/// ```rust
/// use sabor_core::validation::parse_price;
///
/// assert_eq!(parse_price("22,00").unwrap().cents(), 2200);
/// assert!(parse_price("-1").is_err());
/// assert!(parse_price("abc").is_err());
/// ```
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    let price: Money = input
        .parse()
        .map_err(|e: crate::error::ParseMoneyError| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: e.to_string(),
        })?;

    validate_price(price)
}

/// Rejects negative prices.
pub fn validate_price(price: Money) -> ValidationResult<Money> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(price)
}

/// Validates a surrogate id (positive integer).
pub fn validate_id(field: &str, id: i64) -> ValidationResult<i64> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(id)
}

/// Validates a quantity taken from stock (positive integer).
pub fn validate_quantity(field: &str, quantity: i64) -> ValidationResult<i64> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(quantity)
}

/// Validates an absolute on-hand quantity (zero allowed).
pub fn validate_stock_level(field: &str, quantity: i64) -> ValidationResult<i64> {
    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(quantity)
}

/// Parses an integer typed as text, e.g. a quantity field sent as `"35"`.
///
/// Fractional or non-numeric input is rejected rather than truncated.
pub fn parse_integer(field: &str, input: &str) -> ValidationResult<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be an integer".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
