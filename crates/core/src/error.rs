// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use veilingklok_domain::{DomainError, Location, Money, ProductId, ProductStatus};

/// Reported when `StartAuctions` finds nothing scheduled for the current date.
pub const NO_AUCTIONS_TODAY: &str = "No auctions scheduled for today";

/// Reported when a location has no lot on the clock.
pub const NO_ACTIVE_PRODUCT: &str = "No active product found";

/// Reported when a location has no scheduled lot left to bring up.
pub const NO_NEXT_PRODUCT: &str = "No next product available";

/// Errors that can occur during lifecycle operations.
///
/// Every variant is recoverable at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A domain rule was violated (including illegal status transitions).
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// The requested entity, or an eligible candidate, does not exist.
    #[error("{message}")]
    NotFound {
        /// Human-readable message surfaced verbatim to the caller.
        message: String,
    },
    /// The caller's identity is missing or is not a buyer.
    #[error("Unauthorized: {reason}")]
    Unauthorized {
        /// Why the identity was rejected.
        reason: String,
    },
    /// The product was sold earlier and cannot be sold again.
    #[error("Product {product_id} has already been sold")]
    AlreadySold {
        /// The product.
        product_id: ProductId,
    },
    /// The product is not on the clock.
    #[error("Product {product_id} is not on the clock (status {status})")]
    LotNotActive {
        /// The product.
        product_id: ProductId,
        /// Its current status.
        status: ProductStatus,
    },
    /// The location already has an active lot.
    #[error("Location {location} already has an active lot")]
    LocationBusy {
        /// The location.
        location: Location,
    },
    /// The offered price is below the product's floor.
    #[error("Offered price {offered} is below the minimum price {minimum}")]
    PriceBelowMinimum {
        /// The offered sale price.
        offered: Money,
        /// The product's minimum price.
        minimum: Money,
    },
    /// A conditional update lost a race with another request.
    #[error("Conflict: {message}")]
    Conflict {
        /// What was contended.
        message: String,
    },
    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl CoreError {
    /// Creates a `NotFound` error with the given message.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a `Conflict` error with the given message.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}
