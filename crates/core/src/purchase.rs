// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::store::LotStore;
use time::OffsetDateTime;
use tracing::{info, warn};
use veilingklok_domain::{
    Account, AccountId, Money, Product, ProductId, ProductStatus, Sale, StatusTransition,
    format_timestamp,
};

/// Sells the lot on the clock to a buyer.
///
/// `buyer` is the account id resolved by the session layer, or `None` when
/// the request carried no identity. The next lot is not brought up; the
/// caller does that explicitly with `open_lot`.
///
/// `sale_price` is the price the buyer saw when stopping the clock. Only
/// the product's minimum price is enforced here, not the clock position.
///
/// # Returns
///
/// The product as sold.
///
/// # Errors
///
/// In check order:
/// - `NotFound` if the product does not exist
/// - `Unauthorized` if `buyer` is missing, unknown, or not a buyer account
/// - `AlreadySold` if the product was sold before
/// - `LotNotActive` if the product is not on the clock
/// - `PriceBelowMinimum` if `sale_price` is under the product's floor
/// - `AlreadySold` or `Conflict` if another purchase won the race
pub fn purchase<S: LotStore>(
    store: &mut S,
    product_id: ProductId,
    buyer: Option<AccountId>,
    sale_price: Money,
    now: OffsetDateTime,
) -> Result<Product, CoreError> {
    let product: Product = store
        .find_product(product_id)?
        .ok_or_else(|| CoreError::not_found(format!("Product {product_id} not found")))?;

    let buyer: Account = resolve_buyer(store, buyer)?;

    match product.status {
        ProductStatus::Active => {}
        ProductStatus::Sold => return Err(CoreError::AlreadySold { product_id }),
        status => return Err(CoreError::LotNotActive { product_id, status }),
    }

    if sale_price < product.minimum_price {
        return Err(CoreError::PriceBelowMinimum {
            offered: sale_price,
            minimum: product.minimum_price,
        });
    }

    product.status.validate_transition(ProductStatus::Sold)?;

    let sale: Sale = Sale {
        buyer_id: buyer.account_id,
        sale_price,
    };
    if !store.record_sale(product_id, sale)? {
        warn!(product_id, buyer_id = buyer.account_id, "Lost purchase race");
        let latest: Option<ProductStatus> = store.find_product(product_id)?.map(|p| p.status);
        return Err(match latest {
            Some(ProductStatus::Sold) => CoreError::AlreadySold { product_id },
            _ => CoreError::conflict(format!("Product {product_id} left the clock")),
        });
    }

    store.record_transition(&StatusTransition::new(
        product_id,
        Some(ProductStatus::Active),
        ProductStatus::Sold,
        "purchase",
        format_timestamp(now),
    ))?;

    info!(
        product_id,
        buyer_id = buyer.account_id,
        sale_price = %sale_price,
        location = %product.location,
        "Product sold"
    );

    Ok(Product {
        status: ProductStatus::Sold,
        buyer_id: Some(buyer.account_id),
        sale_price: Some(sale_price),
        ..product
    })
}

/// Resolves the caller's identity to a buyer account.
///
/// # Errors
///
/// Returns `Unauthorized` if the identity is missing, unknown, or not a buyer.
pub fn resolve_buyer<S: LotStore>(
    store: &mut S,
    buyer: Option<AccountId>,
) -> Result<Account, CoreError> {
    let account_id: AccountId = buyer.ok_or_else(|| CoreError::Unauthorized {
        reason: String::from("no buyer identity on request"),
    })?;

    let account: Account =
        store
            .find_account(account_id)?
            .ok_or_else(|| CoreError::Unauthorized {
                reason: format!("account {account_id} does not exist"),
            })?;

    if !account.is_buyer() {
        return Err(CoreError::Unauthorized {
            reason: format!("account {account_id} is not a buyer"),
        });
    }

    Ok(account)
}
