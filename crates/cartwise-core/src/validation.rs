//! # Validation Module
//!
//! Strict input checks for callers that want to reject bad cart input
//! instead of letting the reducer clamp it.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller (optional)                 Reducer (always)                     │
//! │  ─────────────────                 ────────────────                     │
//! │  validate_quantity(-5) → Err       UpdateQuantity(-5) → clamp to 0      │
//! │  validate_quantity(0)  → Err       AddToCart(0)       → ignored         │
//! │  validate_product_id("") → Err     RemoveFromCart("") → no-op           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartwise_core::validation::{validate_product, validate_quantity};
//! use cartwise_core::types::Product;
//!
//! assert!(validate_quantity(3).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_product(&Product::new("A", 100)).is_ok());
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{Product, Rate};

/// Longest accepted product id.
pub const MAX_PRODUCT_ID_LEN: usize = 64;

/// Largest quantity a strict caller accepts for one line.
pub const MAX_ITEM_QUANTITY: i64 = 999;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a product id.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 64 characters
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    if id.len() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "product id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_ITEM_QUANTITY` (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a rate: 0% to 100%.
pub fn validate_rate(field: &str, rate: Rate) -> ValidationResult<()> {
    if rate.bps() > Rate::MAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::from(Rate::MAX_BPS),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates everything the cart reads from a product.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_id(&product.id)?;
    validate_price_cents(product.price_cents)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("A").is_ok());
        assert!(validate_product_id("sku-330_ml").is_ok());

        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("   ").is_err());
        assert!(validate_product_id(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert_eq!(
            validate_quantity(0),
            Err(ValidationError::MustBePositive {
                field: "quantity".to_string()
            })
        );
        assert!(validate_quantity(-5).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("discount", Rate::from_bps(0)).is_ok());
        assert!(validate_rate("discount", Rate::from_bps(10_000)).is_ok());
        assert!(validate_rate("discount", Rate::from_bps(10_001)).is_err());
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&Product::new("A", 100)).is_ok());
        assert!(validate_product(&Product::new("", 100)).is_err());
        assert!(validate_product(&Product::new("A", -100)).is_err());
    }
}
