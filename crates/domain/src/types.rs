// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::location::Location;
use crate::money::Money;
use crate::status::ProductStatus;
use std::str::FromStr;
use time::Date;

/// Canonical product identifier.
pub type ProductId = i64;

/// Canonical account identifier.
pub type AccountId = i64;

/// What an account may do on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountRole {
    /// Lists products ("Aanvoerder").
    Supplier,
    /// Buys products on the clock ("Inkoper").
    Buyer,
}

impl AccountRole {
    /// Returns the string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::Buyer => "buyer",
        }
    }
}

impl FromStr for AccountRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supplier" | "aanvoerder" => Ok(Self::Supplier),
            "buyer" | "inkoper" => Ok(Self::Buyer),
            _ => Err(DomainError::InvalidAccountRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A marketplace account.
///
/// Only the fields the auction engine needs; credentials and company data
/// live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_id: AccountId,
    pub name: String,
    pub role: AccountRole,
}

impl Account {
    /// Returns true if this account may purchase lots.
    #[must_use]
    pub fn is_buyer(&self) -> bool {
        self.role == AccountRole::Buyer
    }
}

/// A product as stored, including its lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub minimum_price: Money,
    pub starting_price: Money,
    pub sale_price: Option<Money>,
    pub location: Location,
    pub scheduled_date: Option<Date>,
    pub status: ProductStatus,
    pub supplier_id: AccountId,
    pub buyer_id: Option<AccountId>,
    pub created_at: String,
}

/// A product submitted by a supplier, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub minimum_price: Money,
    pub starting_price: Money,
    pub location: Location,
    pub supplier_id: AccountId,
}

/// Details of a completed purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sale {
    pub buyer_id: AccountId,
    pub sale_price: Money,
}

/// A single recorded status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub product_id: ProductId,
    /// `None` for the initial registration.
    pub previous_status: Option<ProductStatus>,
    pub new_status: ProductStatus,
    /// Name of the engine operation that made the change.
    pub operation: String,
    pub transitioned_at: String,
}

impl StatusTransition {
    /// Creates a transition record for an engine operation.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        previous_status: Option<ProductStatus>,
        new_status: ProductStatus,
        operation: &str,
        transitioned_at: String,
    ) -> Self {
        Self {
            product_id,
            previous_status,
            new_status,
            operation: operation.to_string(),
            transitioned_at,
        }
    }
}
