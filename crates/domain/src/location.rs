// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Physical auction locations.
//!
//! Each location runs exactly one clock, so the location code doubles as
//! the clock identifier.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A physical auction location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Location {
    /// Aalsmeer.
    A,
    /// Naaldwijk.
    B,
    /// Rijnsburg.
    C,
    /// Eelde.
    D,
}

impl Location {
    /// Every location, in code order.
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Returns the single-letter code stored in the database.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// Returns the display name of the auction hall.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "Aalsmeer",
            Self::B => "Naaldwijk",
            Self::C => "Rijnsburg",
            Self::D => "Eelde",
        }
    }

    /// Parses a location code, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLocation` for unknown codes.
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        let trimmed: &str = code.trim();
        Self::ALL
            .into_iter()
            .find(|location| location.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidLocation(code.to_string()))
    }
}

impl FromStr for Location {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Location {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.code().to_string()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
