// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A status code outside the closed status vocabulary.
    InvalidStatus {
        /// The offending code or name.
        status: String,
    },
    /// A status transition not permitted by the lifecycle table.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
    /// Location code is not one of the known auction locations.
    InvalidLocation(String),
    /// A currency amount is negative, non-finite or out of range.
    InvalidMoney(String),
    /// A product field failed validation.
    InvalidProduct {
        /// The field that failed.
        field: &'static str,
        /// A human-readable description.
        message: String,
    },
    /// Account role is not `supplier` or `buyer`.
    InvalidAccountRole(String),
    /// Account name is empty or invalid.
    InvalidAccountName(String),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus { status } => write!(f, "Invalid product status: {status}"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition from {from} to {to}: {reason}")
            }
            Self::InvalidLocation(code) => write!(f, "Invalid location: '{code}'"),
            Self::InvalidMoney(msg) => write!(f, "Invalid amount: {msg}"),
            Self::InvalidProduct { field, message } => {
                write!(f, "Invalid product {field}: {message}")
            }
            Self::InvalidAccountRole(role) => {
                write!(
                    f,
                    "Invalid account role: '{role}'. Must be 'supplier' or 'buyer'"
                )
            }
            Self::InvalidAccountName(msg) => write!(f, "Invalid account name: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
