//! # Submission Types
//!
//! Pure data exchanged between the composer and whoever performs the
//! remote writes.
//!
//! ```text
//! SaleComposer::begin_submit ──► SubmissionPlan ──► (vendas-client)
//!                                                     │ create sale
//!                                                     │ create N line items
//!                                                     ▼
//! SaleComposer::finish_submit ◄── SubmissionOutcome ◄─┘
//! ```
//!
//! Line items are written concurrently, so their results come back as a
//! [`BatchResult`] instead of a single pass/fail.

use serde::{Deserialize, Serialize};

use crate::cart::SelectedLine;
use crate::types::{NewSale, ProductId, Sale, SaleId, SaleLineItem};

/// Request body for one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub quantity: i64,
}

impl NewLineItem {
    pub fn for_line(sale_id: SaleId, line: &SelectedLine) -> Self {
        NewLineItem {
            sale_id,
            product_id: line.product_id,
            quantity: line.quantity,
        }
    }
}

/// Everything needed to submit the cart: the sale header and the lines
/// that become line items once the sale id is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub sale: NewSale,
    pub lines: Vec<SelectedLine>,
}

/// Lines still missing from an already created sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPlan {
    pub sale: Sale,
    pub lines: Vec<SelectedLine>,
}

impl RetryPlan {
    pub fn line_items(&self) -> Vec<NewLineItem> {
        self.lines
            .iter()
            .map(|l| NewLineItem::for_line(self.sale.id, l))
            .collect()
    }
}

/// A line whose line-item write failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedLine {
    pub line: SelectedLine,
    pub message: String,
}

/// Per-line results of the concurrent line-item writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub succeeded: Vec<SaleLineItem>,
    pub failed: Vec<FailedLine>,
}

impl BatchResult {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Sale and every line item were created.
    Completed { sale: Sale, items: Vec<SaleLineItem> },

    /// Sale was created but some line items failed. The sale stays on the
    /// server with a partial set of items.
    Partial { sale: Sale, batch: BatchResult },

    /// Sale creation failed. Nothing was written, unless the backend
    /// answered 2xx with an unreadable body; `message` then says so.
    SaleRejected { message: String },
}

impl SubmissionOutcome {
    /// Classifies the line-item results for a created sale.
    pub fn from_batch(sale: Sale, batch: BatchResult) -> Self {
        if batch.is_complete() {
            SubmissionOutcome::Completed {
                sale,
                items: batch.succeeded,
            }
        } else {
            SubmissionOutcome::Partial { sale, batch }
        }
    }
}
