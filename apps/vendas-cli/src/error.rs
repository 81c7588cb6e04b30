//! # CLI Error Reporting
//!
//! Maps failures to a short code and a process exit status.
//!
//! ```text
//! anyhow::Error ──► downcast ClientError / CoreError / ValidationError
//!                        │
//!                        ▼
//!                   ErrorCode ──► stderr "error[NOT_FOUND]: Produto não encontrado"
//!                        │
//!                        ▼
//!                   exit status (2..=6)
//! ```

use std::process::ExitCode;

use vendas_client::{ClientError, ConfigError};
use vendas_core::{CoreError, ValidationError};

/// Failure category, shown to the user and used for the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Input rejected before anything was sent
    Validation,

    /// The backend has no such record (404)
    NotFound,

    /// Backend unreachable, timed out, or answered with an error
    Remote,

    /// Bad config file or URL
    Config,

    /// The sale exists but some of its line items do not
    PartialSale,

    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Remote => "REMOTE_ERROR",
            ErrorCode::Config => "CONFIG_ERROR",
            ErrorCode::PartialSale => "PARTIAL_SALE",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(match self {
            ErrorCode::Internal => 1,
            ErrorCode::Validation => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::Remote => 4,
            ErrorCode::Config => 5,
            ErrorCode::PartialSale => 6,
        })
    }
}

/// A sale was created but could not be completed; the user must fix it
/// on the backend.
#[derive(Debug, thiserror::Error)]
#[error("sale {sale_id} was registered without {missing} line item(s): {details}")]
pub struct PartialSaleError {
    pub sale_id: i64,
    pub missing: usize,
    pub details: String,
}

/// A remote failure the composer recorded as a message instead of
/// returning (catalog load, sale rejected by the backend).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct RemoteFailure(pub String);

/// Classifies an error from any layer.
pub fn classify(err: &anyhow::Error) -> ErrorCode {
    if err.downcast_ref::<PartialSaleError>().is_some() {
        return ErrorCode::PartialSale;
    }
    if err.downcast_ref::<RemoteFailure>().is_some() {
        return ErrorCode::Remote;
    }
    if let Some(e) = err.downcast_ref::<ClientError>() {
        return match e {
            ClientError::Validation(_) => ErrorCode::Validation,
            ClientError::Composer(core) => classify_core(core),
            ClientError::Config(_) => ErrorCode::Config,
            e if e.is_not_found() => ErrorCode::NotFound,
            _ => ErrorCode::Remote,
        };
    }
    if let Some(e) = err.downcast_ref::<CoreError>() {
        return classify_core(e);
    }
    if err.downcast_ref::<ValidationError>().is_some() {
        return ErrorCode::Validation;
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return ErrorCode::Config;
    }
    ErrorCode::Internal
}

fn classify_core(err: &CoreError) -> ErrorCode {
    match err {
        CoreError::Validation(_) => ErrorCode::Validation,
        CoreError::InvalidPhase { .. } => ErrorCode::Internal,
    }
}
