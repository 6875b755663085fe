// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Status-changing writes are conditional on the expected prior status and
//! report whether a row was changed. Constraint failures are returned as
//! `PersistenceError::ConstraintViolation` so that callers can tell a lost
//! race from a broken database.

pub mod accounts;
pub mod history;
pub mod products;
