//! # Validation Module
//!
//! Input validation utilities for Vendas.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  └── Types and formats (integers, dates)                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Quantities and snapshot stock                                     │
//! │  └── Product / client input before any request is sent                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Sales backend                                                │
//! │  └── Its own checks (external, not relied on here)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ClientInput, Product, ProductInput, ProductPatch};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product or client name.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Quantity & Stock
// =============================================================================

/// Validates a requested line quantity.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::SelectionRequired);
    }
    Ok(())
}

/// Checks `requested` units against the product's snapshot stock.
///
/// `requested` is the cumulative quantity the cart would hold, not only
/// the amount being added.
///
/// ## Example
/// ```rust
/// use vendas_core::money::Money;
/// use vendas_core::types::Product;
/// use vendas_core::validation::validate_stock;
///
/// let product = Product {
///     id: 1,
///     name: "A".into(),
///     description: None,
///     unit_price: Money::from_cents(1000),
///     stock_quantity: 5,
/// };
/// assert!(validate_stock(&product, 5).is_ok());
/// assert!(validate_stock(&product, 6).is_err());
/// ```
pub fn validate_stock(product: &Product, requested: i64) -> ValidationResult<()> {
    if !product.can_sell(requested) {
        return Err(ValidationError::InsufficientStock {
            product_id: product.id,
            available: product.stock_quantity,
            requested,
        });
    }
    Ok(())
}

// =============================================================================
// Product & Client Input
// =============================================================================

/// Validates a display name (product or client).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level. Zero is allowed.
pub fn validate_stock_quantity(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates every field of a new product.
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_price(input.unit_price)?;
    validate_stock_quantity(input.stock_quantity)?;
    Ok(())
}

/// Validates the fields present in a partial update.
pub fn validate_product_patch(patch: &ProductPatch) -> ValidationResult<()> {
    if patch.is_empty() {
        return Err(ValidationError::Required {
            field: "at least one field".to_string(),
        });
    }
    if let Some(name) = &patch.name {
        validate_name("name", name)?;
    }
    if let Some(price) = patch.unit_price {
        validate_price(price)?;
    }
    if let Some(stock) = patch.stock_quantity {
        validate_stock_quantity(stock)?;
    }
    Ok(())
}

/// Validates a new client. The backend requires an email.
pub fn validate_client_input(input: &ClientInput) -> ValidationResult<()> {
    validate_name("name", &input.name)?;

    let email = input.email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }
    if !email.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must contain '@'".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Dates
// =============================================================================

/// Validates a report date range; both bounds are optional.
pub fn validate_date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ValidationResult<()> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ValidationError::InvalidFormat {
                field: "date range".to_string(),
                reason: format!("start {from} is after end {to}"),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
