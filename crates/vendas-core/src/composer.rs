//! # Sale Composer
//!
//! The state machine behind the point-of-sale form: it turns a sequence of
//! user selections into a validated sale submission.
//!
//! ## Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌─────────┐ finish_loading(Err) ┌────────────┐                       │
//! │   │ Loading │ ──────────────────► │ LoadFailed │ ── begin_loading ─┐   │
//! │   └────┬────┘ ◄──────────────────────────────────────────────────────┘   │
//! │        │ finish_loading(Ok)                                             │
//! │        ▼                                                                │
//! │   ┌───────────┐  advance (cart non-empty)  ┌───────────┐               │
//! │   │ Selecting │ ─────────────────────────► │ Reviewing │               │
//! │   │           │ ◄───────────────────────── │           │               │
//! │   └─────┬─────┘           back             └─────┬─────┘               │
//! │         │ begin_submit                           │ begin_submit        │
//! │         ▼                                        ▼                      │
//! │   ┌──────────────────────────────────────────────────┐                 │
//! │   │                   Submitting                      │                 │
//! │   └───┬───────────────────┬──────────────────────┬───┘                 │
//! │       │ Completed         │ SaleRejected         │ Partial             │
//! │       ▼                   ▼                      ▼                      │
//! │   Selecting (reset)   previous phase,      NeedsReconciliation         │
//! │                       cart untouched       (cart = failed lines)       │
//! │                                              │ begin_retry / abandon   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The composer never performs I/O. Remote work is requested through the
//! `begin_*` methods, which return plans, and its results are applied with
//! the matching `finish_*` methods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::submission::{BatchResult, FailedLine, RetryPlan, SubmissionOutcome, SubmissionPlan};
use crate::types::{Catalog, ClientId, NewSale, ProductId, Sale};
use crate::validation::validate_stock;

// =============================================================================
// Phase
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the product and client lists.
    Loading,

    /// Catalog fetch failed; the composer is unusable until reloaded.
    LoadFailed { message: String },

    /// Building the cart.
    Selecting,

    /// Confirming the cart before submission.
    Reviewing,

    /// Remote writes in flight; the cart is frozen.
    Submitting,

    /// The sale exists on the server but some line items do not. The cart
    /// holds only the missing lines.
    NeedsReconciliation { sale: Sale },
}

impl Phase {
    fn is_editable(&self) -> bool {
        matches!(self, Phase::Selecting | Phase::Reviewing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Loading => write!(f, "loading"),
            Phase::LoadFailed { .. } => write!(f, "load failed"),
            Phase::Selecting => write!(f, "selecting"),
            Phase::Reviewing => write!(f, "reviewing"),
            Phase::Submitting => write!(f, "submitting"),
            Phase::NeedsReconciliation { .. } => write!(f, "awaiting reconciliation"),
        }
    }
}

// =============================================================================
// Policy & Pending Selection
// =============================================================================

/// Tunable behavior of the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerPolicy {
    /// Re-check every line against the catalog snapshot before submitting.
    /// Catches quantities raised through `set_line_quantity`.
    pub revalidate_stock: bool,
}

impl Default for ComposerPolicy {
    fn default() -> Self {
        ComposerPolicy {
            revalidate_stock: true,
        }
    }
}

/// The "product" and "quantity" inputs not yet added to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSelection {
    pub product_id: Option<ProductId>,
    pub quantity: i64,
}

impl Default for PendingSelection {
    fn default() -> Self {
        PendingSelection {
            product_id: None,
            quantity: 1,
        }
    }
}

/// Derived view of what would be submitted right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleDraft {
    pub client_id: Option<ClientId>,
    pub total: Money,
}

// =============================================================================
// Sale Composer
// =============================================================================

/// Client-side cart builder for a single point-of-sale form.
///
/// ## Usage
/// ```rust
/// use chrono::NaiveDate;
/// use vendas_core::composer::{Phase, SaleComposer};
/// use vendas_core::money::Money;
/// use vendas_core::types::{Catalog, Product};
///
/// let mut composer = SaleComposer::default();
/// let catalog = Catalog::new(
///     vec![Product {
///         id: 1,
///         name: "A".into(),
///         description: None,
///         unit_price: Money::from_cents(1000),
///         stock_quantity: 5,
///     }],
///     vec![],
/// );
/// composer.finish_loading(Ok::<_, String>(catalog)).unwrap();
///
/// composer.add_line(1, 3).unwrap();
/// assert_eq!(composer.total().cents(), 3000);
/// assert!(composer.add_line(1, 3).is_err()); // 6 > 5 in stock
///
/// let plan = composer
///     .begin_submit(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())
///     .unwrap();
/// assert_eq!(plan.sale.total.cents(), 3000);
/// assert_eq!(composer.phase(), &Phase::Submitting);
/// ```
#[derive(Debug, Clone)]
pub struct SaleComposer {
    phase: Phase,
    catalog: Catalog,
    cart: Cart,
    client_id: Option<ClientId>,
    pending: PendingSelection,
    error: Option<String>,
    policy: ComposerPolicy,
    /// Phase to go back to when an in-flight write fails outright.
    resume_phase: Option<Phase>,
}

impl Default for SaleComposer {
    fn default() -> Self {
        SaleComposer::new(ComposerPolicy::default())
    }
}

impl SaleComposer {
    /// Creates a composer in the `Loading` phase.
    pub fn new(policy: ComposerPolicy) -> Self {
        SaleComposer {
            phase: Phase::Loading,
            catalog: Catalog::default(),
            cart: Cart::new(),
            client_id: None,
            pending: PendingSelection::default(),
            error: None,
            policy,
            resume_phase: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    pub fn pending(&self) -> PendingSelection {
        self.pending
    }

    /// Last user-visible error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn policy(&self) -> ComposerPolicy {
        self.policy
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Restarts the catalog load after a failure.
    pub fn begin_loading(&mut self) -> CoreResult<()> {
        match self.phase {
            Phase::Loading | Phase::LoadFailed { .. } => {
                self.phase = Phase::Loading;
                self.error = None;
                Ok(())
            }
            _ => Err(self.invalid_phase("reload the catalog")),
        }
    }

    /// Applies the result of fetching products and clients.
    pub fn finish_loading<E: fmt::Display>(&mut self, result: Result<Catalog, E>) -> CoreResult<()> {
        if self.phase != Phase::Loading {
            return Err(self.invalid_phase("finish loading"));
        }

        match result {
            Ok(catalog) => {
                self.catalog = catalog;
                self.error = None;
                self.phase = Phase::Selecting;
            }
            Err(e) => {
                let message = format!("failed to load catalog: {e}");
                self.error = Some(message.clone());
                self.phase = Phase::LoadFailed { message };
            }
        }
        Ok(())
    }

    // =========================================================================
    // Cart Editing
    // =========================================================================

    /// Adds `quantity` units of a catalog product to the cart.
    ///
    /// ## Rules
    /// - Unknown product or quantity < 1: "select product and valid quantity"
    /// - Existing + new quantity above snapshot stock:
    ///   "insufficient stock: N available"
    /// - Same product twice merges into one line
    ///
    /// On success the error and the pending selection are cleared. On
    /// failure the cart is unchanged and the message is recorded.
    pub fn add_line(&mut self, product_id: ProductId, quantity: i64) -> CoreResult<()> {
        self.ensure_editable("add a line")?;

        let result = match self.catalog.product(product_id) {
            Some(product) => self.cart.add(product, quantity),
            None => Err(ValidationError::SelectionRequired),
        };

        match result {
            Ok(()) => {
                self.error = None;
                self.pending = PendingSelection::default();
                Ok(())
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Updates the pending product/quantity inputs.
    pub fn set_pending(&mut self, product_id: Option<ProductId>, quantity: i64) {
        self.pending = PendingSelection {
            product_id,
            quantity,
        };
    }

    /// Adds the pending selection to the cart.
    pub fn add_pending(&mut self) -> CoreResult<()> {
        self.ensure_editable("add a line")?;
        match self.pending.product_id {
            Some(product_id) => self.add_line(product_id, self.pending.quantity),
            None => Err(self.reject(ValidationError::SelectionRequired)),
        }
    }

    /// Removes a line. Absent ids are a no-op.
    ///
    /// Removing the last line while reviewing returns to `Selecting`.
    pub fn remove_line(&mut self, product_id: ProductId) -> CoreResult<bool> {
        self.ensure_editable("remove a line")?;
        let removed = self.cart.remove(product_id);
        if self.cart.is_empty() && self.phase == Phase::Reviewing {
            self.phase = Phase::Selecting;
        }
        Ok(removed)
    }

    /// Sets a line's quantity, clamped to at least 1. Stock is checked
    /// again at submit time when the policy asks for it. A quantity whose
    /// total would overflow is rejected and the line keeps its quantity.
    pub fn set_line_quantity(&mut self, product_id: ProductId, quantity: i64) -> CoreResult<bool> {
        self.ensure_editable("change a quantity")?;
        match self.cart.set_quantity(product_id, quantity) {
            Ok(changed) => Ok(changed),
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Selects the client for the sale, or `None` for a walk-in sale.
    pub fn set_client(&mut self, client_id: Option<ClientId>) -> CoreResult<()> {
        self.ensure_editable("select a client")?;
        if let Some(id) = client_id {
            if self.catalog.client(id).is_none() {
                return Err(self.reject(ValidationError::UnknownClient(id)));
            }
        }
        self.client_id = client_id;
        Ok(())
    }

    /// Exact cart total.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    pub fn draft(&self) -> SaleDraft {
        SaleDraft {
            client_id: self.client_id,
            total: self.total(),
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Moves from `Selecting` to `Reviewing`. Blocked on an empty cart.
    ///
    /// Returns whether the phase changed.
    pub fn advance(&mut self) -> bool {
        if self.phase == Phase::Selecting && !self.cart.is_empty() {
            self.phase = Phase::Reviewing;
            return true;
        }
        false
    }

    /// Moves from `Reviewing` back to `Selecting`.
    pub fn back(&mut self) -> bool {
        if self.phase == Phase::Reviewing {
            self.phase = Phase::Selecting;
            return true;
        }
        false
    }

    /// Discards the cart, client and pending inputs.
    pub fn cancel(&mut self) -> CoreResult<()> {
        self.ensure_editable("cancel")?;
        self.reset();
        Ok(())
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Freezes the cart and returns what must be written remotely.
    ///
    /// ## Sequence
    /// ```text
    /// cart non-empty? ── no ──► "add at least one product"
    ///      │ yes
    ///      ▼
    /// revalidate stock (policy) ── exceeded ──► "insufficient stock: N available"
    ///      │ ok
    ///      ▼
    /// phase = Submitting, return SubmissionPlan { NewSale{client, today, total}, lines }
    /// ```
    pub fn begin_submit(&mut self, today: NaiveDate) -> CoreResult<SubmissionPlan> {
        self.ensure_editable("submit")?;

        if self.cart.is_empty() {
            return Err(self.reject(ValidationError::EmptyCart));
        }

        if self.policy.revalidate_stock {
            if let Err(e) = self.revalidate_stock() {
                return Err(self.reject(e));
            }
        }

        let Some(total) = self.cart.checked_total() else {
            return Err(self.reject(ValidationError::AmountTooLarge));
        };

        let plan = SubmissionPlan {
            sale: NewSale {
                client_id: self.client_id,
                date: today,
                total,
            },
            lines: self.cart.lines().to_vec(),
        };

        self.resume_phase = Some(std::mem::replace(&mut self.phase, Phase::Submitting));
        Ok(plan)
    }

    /// Applies the outcome of a submission started with `begin_submit`.
    pub fn finish_submit(&mut self, outcome: SubmissionOutcome) -> CoreResult<()> {
        let resume = self.take_resume("finish a submission")?;
        if matches!(resume, Phase::NeedsReconciliation { .. }) {
            self.phase = Phase::Submitting;
            self.resume_phase = Some(resume);
            return Err(self.invalid_phase("finish a submission"));
        }

        match outcome {
            SubmissionOutcome::Completed { .. } => self.reset(),
            SubmissionOutcome::SaleRejected { message } => {
                self.error = Some(format!("failed to register sale: {message}"));
                self.phase = resume;
            }
            SubmissionOutcome::Partial { sale, batch } => {
                self.enter_reconciliation(sale, batch.failed);
            }
        }
        Ok(())
    }

    /// Starts resubmitting the missing line items of a partial sale.
    pub fn begin_retry(&mut self) -> CoreResult<RetryPlan> {
        let sale = match &self.phase {
            Phase::NeedsReconciliation { sale } => sale.clone(),
            _ => return Err(self.invalid_phase("retry line items")),
        };

        let plan = RetryPlan {
            sale,
            lines: self.cart.lines().to_vec(),
        };
        self.resume_phase = Some(std::mem::replace(&mut self.phase, Phase::Submitting));
        Ok(plan)
    }

    /// Applies the results of a retry started with `begin_retry`.
    pub fn finish_retry(&mut self, batch: BatchResult) -> CoreResult<()> {
        let resume = self.take_resume("finish a retry")?;
        let sale = match resume {
            Phase::NeedsReconciliation { sale } => sale,
            other => {
                self.phase = Phase::Submitting;
                self.resume_phase = Some(other);
                return Err(self.invalid_phase("finish a retry"));
            }
        };

        if batch.is_complete() {
            self.reset();
        } else {
            self.enter_reconciliation(sale, batch.failed);
        }
        Ok(())
    }

    /// Gives up on the missing line items. The partial sale stays on the
    /// server; it is returned so the caller can report it.
    pub fn abandon(&mut self) -> CoreResult<Sale> {
        match std::mem::replace(&mut self.phase, Phase::Selecting) {
            Phase::NeedsReconciliation { sale } => {
                self.reset();
                Ok(sale)
            }
            other => {
                self.phase = other;
                Err(self.invalid_phase("abandon a sale"))
            }
        }
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn ensure_editable(&self, operation: &'static str) -> CoreResult<()> {
        if self.phase.is_editable() {
            Ok(())
        } else {
            Err(self.invalid_phase(operation))
        }
    }

    fn invalid_phase(&self, operation: &'static str) -> CoreError {
        CoreError::InvalidPhase {
            operation,
            phase: self.phase.to_string(),
        }
    }

    /// Records a validation failure for display and converts it.
    fn reject(&mut self, e: ValidationError) -> CoreError {
        self.error = Some(e.to_string());
        e.into()
    }

    fn take_resume(&mut self, operation: &'static str) -> CoreResult<Phase> {
        if self.phase != Phase::Submitting {
            return Err(self.invalid_phase(operation));
        }
        self.resume_phase
            .take()
            .ok_or_else(|| self.invalid_phase(operation))
    }

    fn revalidate_stock(&self) -> Result<(), ValidationError> {
        for line in self.cart.lines() {
            let product = self
                .catalog
                .product(line.product_id)
                .ok_or(ValidationError::SelectionRequired)?;
            validate_stock(product, line.quantity)?;
        }
        Ok(())
    }

    fn enter_reconciliation(&mut self, sale: Sale, failed: Vec<FailedLine>) {
        let details = failed
            .iter()
            .map(|f| format!("product {}: {}", f.line.product_id, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        self.error = Some(format!(
            "sale {} was created but {} line item(s) failed ({details})",
            sale.id,
            failed.len()
        ));

        self.cart.clear();
        for f in failed {
            self.cart.restore(f.line);
        }
        self.phase = Phase::NeedsReconciliation { sale };
    }

    fn reset(&mut self) {
        self.cart.clear();
        self.client_id = None;
        self.pending = PendingSelection::default();
        self.error = None;
        self.resume_phase = None;
        self.phase = Phase::Selecting;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
