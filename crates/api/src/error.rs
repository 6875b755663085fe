// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use tracing::{error, warn};
use veilingklok::CoreError;
use veilingklok_domain::DomainError;
use veilingklok_persistence::PersistenceError;

/// Message returned to clients for failures they cannot act on.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A requested resource, or an eligible lot, was not found.
    NotFound {
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The caller's identity is missing or lacks the buyer role.
    Unauthorized {
        /// Why the identity was rejected.
        reason: String,
    },
    /// The request lost a race or targets a lot in the wrong state.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// An internal error occurred. Details are logged, not returned.
    Internal {
        /// A description safe to show to clients.
        message: String,
    },
}

impl ApiError {
    fn internal() -> Self {
        Self::Internal {
            message: INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { message } | Self::Conflict { message } => write!(f, "{message}"),
            Self::Unauthorized { reason } => write!(f, "Unauthorized: {reason}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Internal { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// Status-model errors mean stored data or engine logic is broken, so they
/// are logged and reported as internal errors.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidStatus { .. } | DomainError::InvalidStatusTransition { .. } => {
            error!(error = %err, "Lifecycle integrity failure");
            ApiError::internal()
        }
        DomainError::InvalidLocation(_) => ApiError::InvalidInput {
            field: String::from("location"),
            message: err.to_string(),
        },
        DomainError::InvalidMoney(_) => ApiError::InvalidInput {
            field: String::from("price"),
            message: err.to_string(),
        },
        DomainError::InvalidProduct { field, message } => ApiError::InvalidInput {
            field: field.to_string(),
            message,
        },
        DomainError::InvalidAccountRole(_) => ApiError::InvalidInput {
            field: String::from("role"),
            message: err.to_string(),
        },
        DomainError::InvalidAccountName(message) => ApiError::InvalidInput {
            field: String::from("name"),
            message,
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::NotFound { message } => ApiError::NotFound { message },
        CoreError::Unauthorized { reason } => {
            warn!(%reason, "Rejected buyer identity");
            ApiError::Unauthorized { reason }
        }
        CoreError::AlreadySold { .. }
        | CoreError::LotNotActive { .. }
        | CoreError::LocationBusy { .. }
        | CoreError::Conflict { .. } => {
            warn!(error = %err, "Lifecycle conflict");
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        CoreError::PriceBelowMinimum { .. } => ApiError::InvalidInput {
            field: String::from("sale_price"),
            message: err.to_string(),
        },
        CoreError::Store(msg) => {
            error!(error = %msg, "Store failure during lifecycle operation");
            ApiError::internal()
        }
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::Lifecycle(core_err) => translate_core_error(core_err),
        PersistenceError::ConstraintViolation(message) => {
            warn!(%message, "Write rejected by database constraint");
            ApiError::Conflict { message }
        }
        PersistenceError::NotFound(message) => ApiError::NotFound { message },
        other => {
            error!(error = %other, "Persistence error");
            ApiError::internal()
        }
    }
}
