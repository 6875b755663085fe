// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Currency amounts.
//!
//! Amounts are held as whole euro cents. JSON carries them as decimal
//! numbers (`6.00`), rounded to the nearest cent on the way in.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A non-negative euro amount in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero euro.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a number of cents.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMoney` if `cents` is negative.
    pub fn from_cents(cents: i64) -> Result<Self, DomainError> {
        if cents < 0 {
            return Err(DomainError::InvalidMoney(format!(
                "{cents} cents is negative"
            )));
        }
        Ok(Self(cents))
    }

    /// Creates an amount from a decimal euro value, rounding to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMoney` if the value is negative, not
    /// finite, or too large to represent.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_euros(euros: f64) -> Result<Self, DomainError> {
        if !euros.is_finite() {
            return Err(DomainError::InvalidMoney(String::from(
                "amount must be a finite number",
            )));
        }
        let cents: f64 = (euros * 100.0).round();
        if cents < 0.0 {
            return Err(DomainError::InvalidMoney(format!("{euros} is negative")));
        }
        // 2^53 cents keeps every value exactly representable as f64
        if cents > 9_007_199_254_740_992.0 {
            return Err(DomainError::InvalidMoney(format!("{euros} is too large")));
        }
        Ok(Self(cents as i64))
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns the amount in euros.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_euros(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_euros())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let euros: f64 = f64::deserialize(deserializer)?;
        Self::from_euros(euros).map_err(serde::de::Error::custom)
    }
}
