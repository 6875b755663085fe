// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Product status tracking and transition logic.
//!
//! A product moves through a closed set of states while it is auctioned.
//! The integer codes are part of the storage and wire contract and must
//! never change:
//!
//! | Code | Status       | Successors |
//! |------|--------------|------------|
//! | 1    | `Registered` | 2          |
//! | 2    | `Scheduled`  | 3          |
//! | 3    | `Active`     | 4, 5       |
//! | 4    | `Sold`       | none       |
//! | 5    | `Paused`     | 2          |

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ProductStatus {
    /// Created by a supplier, not yet scheduled.
    Registered,
    /// Queued for a location ("Ingepland").
    Scheduled,
    /// On the clock ("Geveild").
    Active,
    /// Sold to a buyer ("Verkocht").
    Sold,
    /// Taken off the clock ("Gepauzeerd").
    Paused,
}

impl ProductStatus {
    /// Every status, in code order.
    pub const ALL: [Self; 5] = [
        Self::Registered,
        Self::Scheduled,
        Self::Active,
        Self::Sold,
        Self::Paused,
    ];

    /// Returns the persisted integer code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Registered => 1,
            Self::Scheduled => 2,
            Self::Active => 3,
            Self::Sold => 4,
            Self::Paused => 5,
        }
    }

    /// Parses a persisted integer code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` for any code outside 1..=5.
    pub fn from_code(code: i32) -> Result<Self, DomainError> {
        match code {
            1 => Ok(Self::Registered),
            2 => Ok(Self::Scheduled),
            3 => Ok(Self::Active),
            4 => Ok(Self::Sold),
            5 => Ok(Self::Paused),
            _ => Err(DomainError::InvalidStatus {
                status: code.to_string(),
            }),
        }
    }

    /// Returns the snake case name used in logs and query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Sold => "sold",
            Self::Paused => "paused",
        }
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Sold)
    }

    /// Returns true if the lifecycle permits moving from `self` to `to`.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Registered | Self::Paused, Self::Scheduled)
                | (Self::Scheduled, Self::Active)
                | (Self::Active, Self::Sold | Self::Paused)
        )
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the move is not in
    /// the lifecycle table.
    pub fn validate_transition(self, to: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        if self.can_transition(to) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: "transition not permitted by product lifecycle rules".to_string(),
            })
        }
    }
}

/// Checks a transition given raw persisted codes.
///
/// # Errors
///
/// Returns `DomainError::InvalidStatus` if either code is unknown.
pub fn can_transition_codes(from: i32, to: i32) -> Result<bool, DomainError> {
    let from: ProductStatus = ProductStatus::from_code(from)?;
    let to: ProductStatus = ProductStatus::from_code(to)?;
    Ok(from.can_transition(to))
}

impl From<ProductStatus> for i32 {
    fn from(status: ProductStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for ProductStatus {
    type Error = DomainError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl FromStr for ProductStatus {
    type Err = DomainError;

    /// Accepts either the numeric code or the snake case name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        if let Ok(code) = trimmed.parse::<i32>() {
            return Self::from_code(code);
        }
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidStatus {
                status: s.to_string(),
            })
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}
