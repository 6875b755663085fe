// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Each function validates and converts its request, runs one persistence
//! operation and translates the outcome. Functions that bring a lot onto the
//! clock reset that location's clock after the transaction has committed.

use std::str::FromStr;
use time::{Date, OffsetDateTime};
use tracing::info;
use veilingklok::{LotClock, NO_ACTIVE_PRODUCT};
use veilingklok_domain::{
    Account, AccountId, AccountRole, ClockPricing, Location, Money, NewProduct, Product,
    ProductId, ProductStatus, format_timestamp, parse_date, validate_account_name,
    validate_new_product,
};
use veilingklok_persistence::Persistence;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AccountResponse, ClockResetResponse, CreateAccountRequest, CreateProductRequest,
    CurrentLotResponse, HasPausedAuctionsResponse, ListProductsRequest, ProductResponse,
    PurchaseRequest, ScheduleProductRequest, StatusTransitionResponse,
};

/// Parses a location code from a path or request body.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown code.
pub fn parse_location(code: &str) -> Result<Location, ApiError> {
    Location::parse(code).map_err(translate_domain_error)
}

fn parse_price(field: &str, euros: f64) -> Result<Money, ApiError> {
    Money::from_euros(euros).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn to_responses(products: &[Product]) -> Vec<ProductResponse> {
    products.iter().map(ProductResponse::from).collect()
}

fn require_product(
    persistence: &mut Persistence,
    product_id: ProductId,
) -> Result<Product, ApiError> {
    persistence
        .get_product(product_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            message: format!("Product {product_id} not found"),
        })
}

/// Registers a supplier or buyer account.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty name or an unknown role.
pub fn create_account(
    persistence: &mut Persistence,
    request: &CreateAccountRequest,
    now: OffsetDateTime,
) -> Result<AccountResponse, ApiError> {
    validate_account_name(&request.name).map_err(translate_domain_error)?;
    let role: AccountRole = AccountRole::from_str(&request.role).map_err(translate_domain_error)?;

    let account: Account = persistence
        .create_account(request.name.trim(), role, now)
        .map_err(translate_persistence_error)?;
    Ok(AccountResponse::from(&account))
}

/// Registers a product listed by a supplier.
///
/// # Errors
///
/// Returns an error if:
/// - A field is invalid (`InvalidInput`)
/// - The supplier account does not exist (`NotFound`)
/// - The account is not a supplier (`DomainRuleViolation`)
pub fn register_product(
    persistence: &mut Persistence,
    request: &CreateProductRequest,
    now: OffsetDateTime,
) -> Result<ProductResponse, ApiError> {
    let product: NewProduct = NewProduct {
        name: request.name.trim().to_string(),
        description: request.description.clone(),
        quantity: request.quantity,
        minimum_price: parse_price("minimum_price", request.minimum_price)?,
        starting_price: parse_price("starting_price", request.starting_price)?,
        location: parse_location(&request.location)?,
        supplier_id: request.supplier_id,
    };
    validate_new_product(&product).map_err(translate_domain_error)?;

    let supplier: Account = persistence
        .get_account(request.supplier_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            message: format!("Account {} not found", request.supplier_id),
        })?;
    if supplier.role != AccountRole::Supplier {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("supplier_role"),
            message: format!("Account {} is not a supplier", supplier.account_id),
        });
    }

    let registered: Product = persistence
        .register_product(&product, now)
        .map_err(translate_persistence_error)?;
    Ok(ProductResponse::from(&registered))
}

/// Returns a single product.
///
/// # Errors
///
/// Returns `NotFound` if the product does not exist.
pub fn get_product(
    persistence: &mut Persistence,
    product_id: ProductId,
) -> Result<ProductResponse, ApiError> {
    require_product(persistence, product_id).map(|p| ProductResponse::from(&p))
}

/// Lists products, optionally filtered by status and location.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown status or location filter.
pub fn list_products(
    persistence: &mut Persistence,
    request: &ListProductsRequest,
) -> Result<Vec<ProductResponse>, ApiError> {
    let status: Option<ProductStatus> = request
        .status
        .as_deref()
        .map(|s| {
            ProductStatus::from_str(s).map_err(|e| ApiError::InvalidInput {
                field: String::from("status"),
                message: e.to_string(),
            })
        })
        .transpose()?;
    let location: Option<Location> = request.location.as_deref().map(parse_location).transpose()?;

    let products: Vec<Product> = persistence
        .list_products(status, location)
        .map_err(translate_persistence_error)?;
    Ok(to_responses(&products))
}

/// Returns a product's status history, oldest first.
///
/// # Errors
///
/// Returns `NotFound` if the product does not exist.
pub fn get_product_history(
    persistence: &mut Persistence,
    product_id: ProductId,
) -> Result<Vec<StatusTransitionResponse>, ApiError> {
    require_product(persistence, product_id)?;
    let history = persistence
        .get_status_history(product_id)
        .map_err(translate_persistence_error)?;
    Ok(history.iter().map(StatusTransitionResponse::from).collect())
}

/// Schedules a registered product for an auction date.
///
/// # Errors
///
/// Returns an error if:
/// - The date or location is invalid (`InvalidInput`)
/// - The product does not exist (`NotFound`)
/// - The product is past registration (`Conflict`)
pub fn schedule_product(
    persistence: &mut Persistence,
    product_id: ProductId,
    request: &ScheduleProductRequest,
    now: OffsetDateTime,
) -> Result<ProductResponse, ApiError> {
    let date: Date = parse_date(&request.date).map_err(translate_domain_error)?;
    let location: Option<Location> = request.location.as_deref().map(parse_location).transpose()?;

    let product: Product = persistence
        .schedule_product(product_id, date, location, now)
        .map_err(translate_persistence_error)?;
    Ok(ProductResponse::from(&product))
}

/// Sells the lot on the clock to the calling buyer.
///
/// `buyer` is the identity supplied by the session layer.
///
/// # Errors
///
/// Returns an error if:
/// - The product does not exist (`NotFound`)
/// - The identity is missing or not a buyer (`Unauthorized`)
/// - The lot is sold or not on the clock (`Conflict`)
/// - The price is invalid or below the minimum (`InvalidInput`)
pub fn purchase(
    persistence: &mut Persistence,
    product_id: ProductId,
    buyer: Option<AccountId>,
    request: &PurchaseRequest,
    now: OffsetDateTime,
) -> Result<ProductResponse, ApiError> {
    let sale_price: Money = parse_price("sale_price", request.sale_price)?;

    let sold: Product = persistence
        .purchase(product_id, buyer, sale_price, now)
        .map_err(translate_persistence_error)?;
    Ok(ProductResponse::from(&sold))
}

/// Brings today's scheduled lots onto the clock.
///
/// # Errors
///
/// Returns `NotFound` if nothing is scheduled for today.
pub fn start_auctions(
    persistence: &mut Persistence,
    clock: &dyn LotClock,
    now: OffsetDateTime,
) -> Result<Vec<ProductResponse>, ApiError> {
    let started: Vec<Product> = persistence
        .start_auctions(now)
        .map_err(translate_persistence_error)?;

    for product in &started {
        clock.reset_location(product.location);
    }
    Ok(to_responses(&started))
}

/// Takes every active lot off the clock.
///
/// # Errors
///
/// Returns an error only if the database fails.
pub fn pause_auctions(
    persistence: &mut Persistence,
    now: OffsetDateTime,
) -> Result<Vec<ProductResponse>, ApiError> {
    let paused: Vec<Product> = persistence
        .pause_auctions(now)
        .map_err(translate_persistence_error)?;
    Ok(to_responses(&paused))
}

/// Returns paused lots to the schedule.
///
/// # Errors
///
/// Returns an error only if the database fails.
pub fn resume_auctions(
    persistence: &mut Persistence,
    now: OffsetDateTime,
) -> Result<Vec<ProductResponse>, ApiError> {
    let resumed: Vec<Product> = persistence
        .resume_auctions(now)
        .map_err(translate_persistence_error)?;
    Ok(to_responses(&resumed))
}

/// Reports whether any lot is paused.
///
/// # Errors
///
/// Returns an error only if the database fails.
pub fn has_paused_auctions(
    persistence: &mut Persistence,
) -> Result<HasPausedAuctionsResponse, ApiError> {
    let has_paused: bool = persistence
        .has_paused_auctions()
        .map_err(translate_persistence_error)?;
    Ok(HasPausedAuctionsResponse { has_paused })
}

/// Replaces the lot on the clock at `location` with the next scheduled one.
///
/// # Errors
///
/// Returns `NotFound` when there is no active lot or no successor, and
/// `Conflict` when another request moved either lot first.
pub fn advance(
    persistence: &mut Persistence,
    clock: &dyn LotClock,
    location: Location,
    now: OffsetDateTime,
) -> Result<ProductResponse, ApiError> {
    let next: Product = persistence
        .advance(location, now)
        .map_err(translate_persistence_error)?;

    clock.reset_location(location);
    info!(%location, product_id = next.product_id, "Clock reset for advanced lot");
    Ok(ProductResponse::from(&next))
}

/// Brings the next scheduled lot onto an idle clock.
///
/// # Errors
///
/// Returns `Conflict` if a lot is already on the clock and `NotFound` if
/// nothing is scheduled at `location`.
pub fn open_lot(
    persistence: &mut Persistence,
    clock: &dyn LotClock,
    location: Location,
    now: OffsetDateTime,
) -> Result<ProductResponse, ApiError> {
    let opened: Product = persistence
        .open_lot(location, now)
        .map_err(translate_persistence_error)?;

    clock.reset_location(location);
    Ok(ProductResponse::from(&opened))
}

/// Returns the lot on the clock at `location` with the price it shows now.
///
/// # Errors
///
/// Returns `NotFound` if no lot is on the clock.
pub fn current_lot(
    persistence: &mut Persistence,
    clock: &dyn LotClock,
    pricing: &ClockPricing,
    location: Location,
    now: OffsetDateTime,
) -> Result<CurrentLotResponse, ApiError> {
    let product: Product = persistence
        .current_lot(location)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            message: NO_ACTIVE_PRODUCT.to_string(),
        })?;

    let started_at: Option<OffsetDateTime> = clock.started_at(location);
    let elapsed_ms: u64 = started_at.map_or(0, |started| elapsed_ms(started, now));

    Ok(CurrentLotResponse {
        current_price: pricing.price_at(product.starting_price, product.minimum_price, elapsed_ms),
        remaining_ms: pricing.remaining_ms(elapsed_ms),
        clock_started_at: started_at.map(format_timestamp),
        elapsed_ms,
        product: ProductResponse::from(&product),
    })
}

/// Restarts the clock at `location`.
#[must_use]
pub fn reset_clock(
    clock: &dyn LotClock,
    location: Location,
    now: OffsetDateTime,
) -> ClockResetResponse {
    clock.reset_location(location);
    let started_at: OffsetDateTime = clock.started_at(location).unwrap_or(now);
    info!(%location, "Clock reset on request");
    ClockResetResponse {
        location: location.code().to_string(),
        started_at: format_timestamp(started_at),
    }
}

/// Milliseconds from `started` to `now`, zero if `now` is earlier.
#[must_use]
pub fn elapsed_ms(started: OffsetDateTime, now: OffsetDateTime) -> u64 {
    let millis: i128 = (now - started).whole_milliseconds();
    u64::try_from(millis.max(0)).unwrap_or(u64::MAX)
}
