//! # Error Types
//!
//! Domain-specific error types for vendas-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vendas-core errors (this file)                                        │
//! │  ├── CoreError        - Composer and domain failures                   │
//! │  └── ValidationError  - Input validation failures (shown inline)       │
//! │                                                                         │
//! │  vendas-client errors (separate crate)                                 │
//! │  └── ClientError      - Remote failures (transport, HTTP status)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → CLI message         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, available stock)
//! 3. Errors are enum variants, never String
//! 4. A validation failure leaves the composer usable

use thiserror::Error;

use crate::types::{ClientId, ProductId};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The operation is not allowed in the composer's current phase.
    ///
    /// ## When This Occurs
    /// - Adding lines while the catalog is still loading
    /// - Submitting twice while a submission is in flight
    /// - Retrying line items when nothing needs reconciliation
    #[error("cannot {operation} while composer is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: String,
    },

    /// User input violates a precondition. Displayed as the inner message.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are recovered locally: the message is shown next to the form and
/// the user corrects the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No product selected, unknown product, or quantity below one.
    #[error("select product and valid quantity")]
    SelectionRequired,

    /// Requested (or cumulative) quantity exceeds the snapshot stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart already holds 3 × Product 1 (stock 5)
    ///      │
    ///      ▼
    /// AddLine(1, 3) → cumulative 6
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 1, available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// UI shows: "insufficient stock: 5 available"
    /// ```
    #[error("insufficient stock: {available} available")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// A line or cart total would not fit in the money range.
    ///
    /// ## When This Occurs
    /// - `SetLineQuantity` with an absurd quantity
    /// - A product priced near the limit added many times
    #[error("amount too large: reduce the quantity")]
    AmountTooLarge,

    /// Submit or advance on an empty cart.
    #[error("add at least one product")]
    EmptyCart,

    /// Selected client is not in the catalog snapshot.
    #[error("client not found: {0}")]
    UnknownClient(ClientId),

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format or inconsistent values.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::InsufficientStock {
            product_id: 1,
            available: 5,
            requested: 6,
        };
        assert_eq!(err.to_string(), "insufficient stock: 5 available");
        assert_eq!(
            ValidationError::SelectionRequired.to_string(),
            "select product and valid quantity"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::EmptyCart.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        // transparent: the user sees the validation message unchanged
        assert_eq!(core_err.to_string(), "add at least one product");
    }

    #[test]
    fn test_invalid_phase_message() {
        let err = CoreError::InvalidPhase {
            operation: "submit",
            phase: "loading".to_string(),
        };
        assert_eq!(err.to_string(), "cannot submit while composer is loading");
    }
}
