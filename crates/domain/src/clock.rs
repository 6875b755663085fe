// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Descending-price clock arithmetic.
//!
//! The clock for a lot starts at the starting price and falls linearly to
//! the minimum price over a fixed duration, after which it stays at the
//! minimum until the lot is sold or advanced. Only elapsed time since the
//! lot came on the clock is needed, so any process can derive the same
//! price from the broadcast start timestamp.

use crate::money::Money;
use std::time::Duration;

/// Price-decay settings shared by every location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockPricing {
    duration_ms: u64,
}

impl ClockPricing {
    /// Creates pricing that reaches the minimum after `duration`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Returns the decay duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Returns the price shown after `elapsed_ms` on the clock.
    ///
    /// Never below `minimum`; a zero duration shows the minimum immediately.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn price_at(&self, starting: Money, minimum: Money, elapsed_ms: u64) -> Money {
        if self.duration_ms == 0 || starting <= minimum {
            return minimum;
        }

        let span: i128 = i128::from(starting.cents() - minimum.cents());
        let elapsed: i128 = i128::from(elapsed_ms.min(self.duration_ms));
        let decayed: i128 = span * elapsed / i128::from(self.duration_ms);

        // decayed <= span, so the result fits between minimum and starting
        let cents: i64 = starting.cents() - decayed as i64;
        Money::from_cents(cents).map_or(minimum, |price| price.max(minimum))
    }

    /// Returns how many milliseconds remain before the price bottoms out.
    #[must_use]
    pub const fn remaining_ms(&self, elapsed_ms: u64) -> u64 {
        self.duration_ms.saturating_sub(elapsed_ms)
    }

    /// Returns true once the clock has reached the minimum price.
    #[must_use]
    pub const fn is_expired(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}

impl Default for ClockPricing {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}
