// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Amounts are decimal euros on the wire, dates are `YYYY-MM-DD`, and
//! statuses carry both their numeric code and their name.

use serde::{Deserialize, Serialize};
use veilingklok_domain::{
    Account, AccountId, Money, Product, ProductId, ProductStatus, StatusTransition, format_date,
};

/// API request to register an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name.
    pub name: String,
    /// `supplier` or `buyer`.
    pub role: String,
}

/// API response describing an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account_id: AccountId,
    pub name: String,
    pub role: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id,
            name: account.name.clone(),
            role: account.role.as_str().to_string(),
        }
    }
}

/// API request to register a product for auction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    /// Floor price in euros.
    pub minimum_price: f64,
    /// Opening clock price in euros.
    pub starting_price: f64,
    /// Location code (`A`-`D`).
    pub location: String,
    /// The supplier listing the product.
    pub supplier_id: AccountId,
}

/// Query filters for listing products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProductsRequest {
    /// Status code or name.
    pub status: Option<String>,
    /// Location code.
    pub location: Option<String>,
}

/// API request to schedule a registered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleProductRequest {
    /// Auction date (`YYYY-MM-DD`).
    pub date: String,
    /// Moves the product to another location when present.
    pub location: Option<String>,
}

/// API request to buy the lot on the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// Price the buyer stopped the clock at, in euros.
    pub sale_price: f64,
}

/// API response describing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub minimum_price: Money,
    pub starting_price: Money,
    pub sale_price: Option<Money>,
    pub location: String,
    pub location_name: String,
    pub scheduled_date: Option<String>,
    pub status: i32,
    pub status_name: String,
    pub supplier_id: AccountId,
    pub buyer_id: Option<AccountId>,
    pub created_at: String,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name.clone(),
            description: product.description.clone(),
            quantity: product.quantity,
            minimum_price: product.minimum_price,
            starting_price: product.starting_price,
            sale_price: product.sale_price,
            location: product.location.code().to_string(),
            location_name: product.location.name().to_string(),
            scheduled_date: product.scheduled_date.map(format_date),
            status: product.status.code(),
            status_name: product.status.as_str().to_string(),
            supplier_id: product.supplier_id,
            buyer_id: product.buyer_id,
            created_at: product.created_at.clone(),
        }
    }
}

/// API response describing one status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransitionResponse {
    pub product_id: ProductId,
    pub previous_status: Option<i32>,
    pub new_status: i32,
    pub operation: String,
    pub transitioned_at: String,
}

impl From<&StatusTransition> for StatusTransitionResponse {
    fn from(transition: &StatusTransition) -> Self {
        Self {
            product_id: transition.product_id,
            previous_status: transition.previous_status.map(ProductStatus::code),
            new_status: transition.new_status.code(),
            operation: transition.operation.clone(),
            transitioned_at: transition.transitioned_at.clone(),
        }
    }
}

/// API response for the paused-lot check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasPausedAuctionsResponse {
    pub has_paused: bool,
}

/// The lot on the clock at a location with its live clock position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentLotResponse {
    pub product: ProductResponse,
    /// When the lot came on the clock, if the clock has been started.
    pub clock_started_at: Option<String>,
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
    /// Price the clock shows now.
    pub current_price: Money,
}

/// API response for a clock reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockResetResponse {
    pub location: String,
    pub started_at: String,
}
