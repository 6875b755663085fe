// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::store::LotStore;
use tracing::{debug, warn};
use veilingklok_domain::{Product, ProductStatus, StatusTransition};

/// Moves `product` to `to`, guarded by the lifecycle table and by its
/// current status in the store.
///
/// Returns the product as it now stands. The history entry is written in
/// the same unit of work as the status change.
///
/// # Errors
///
/// - `DomainViolation` if the lifecycle table forbids the move
/// - `Conflict` if another request changed the product first
pub(crate) fn transition<S: LotStore>(
    store: &mut S,
    product: &Product,
    to: ProductStatus,
    operation: &str,
    at: &str,
) -> Result<Product, CoreError> {
    product.status.validate_transition(to)?;

    if !store.compare_and_set_status(product.product_id, product.status, to)? {
        warn!(
            product_id = product.product_id,
            expected = product.status.as_str(),
            operation,
            "Conditional status update affected no rows"
        );
        return Err(CoreError::conflict(format!(
            "Product {} is no longer {}",
            product.product_id,
            product.status.as_str()
        )));
    }

    store.record_transition(&StatusTransition::new(
        product.product_id,
        Some(product.status),
        to,
        operation,
        at.to_string(),
    ))?;

    debug!(
        product_id = product.product_id,
        from = product.status.as_str(),
        to = to.as_str(),
        operation,
        "Product status changed"
    );

    let mut updated: Product = product.clone();
    updated.status = to;
    Ok(updated)
}
