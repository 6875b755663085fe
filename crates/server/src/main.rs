// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod clock;
mod daily;
mod live;
mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info};
use veilingklok_api::{
    AccountResponse, ApiError, ClockResetResponse, CreateAccountRequest, CreateProductRequest,
    CurrentLotResponse, HasPausedAuctionsResponse, ListProductsRequest, ProductResponse,
    PurchaseRequest, ScheduleProductRequest, StatusTransitionResponse, parse_location,
};
use veilingklok_domain::{ClockPricing, Location, ProductId};
use veilingklok_persistence::Persistence;

use crate::clock::{ClockBroadcaster, clock_ticks_handler, run_tick_loop};
use crate::live::{LiveEvent, LiveEventBroadcaster, live_events_handler, product_ids};
use crate::session::BuyerIdentity;

/// Veilingklok Server - HTTP server for the flower auction clock
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Interval between clock ticks, in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_interval_ms: u64,

    /// Time for the clock to fall from starting to minimum price, in seconds
    #[arg(long, default_value_t = 30)]
    clock_duration_secs: u64,

    /// Start today's auctions at startup and at every UTC midnight
    #[arg(long)]
    daily_start: bool,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind an async Mutex; every lifecycle
/// operation additionally runs in its own immediate transaction.
#[derive(Clone)]
pub struct AppState {
    /// Accounts, products and the lifecycle engine.
    persistence: Arc<Mutex<Persistence>>,
    /// Per-location clocks.
    clock: Arc<ClockBroadcaster>,
    /// Lifecycle event fan-out.
    live: Arc<LiveEventBroadcaster>,
    /// Price decay settings for the current lot view.
    pricing: ClockPricing,
}

impl FromRef<AppState> for Arc<ClockBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.clock)
    }
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live)
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

fn location_from_path(code: &str) -> Result<Location, HttpError> {
    parse_location(code).map_err(HttpError::from)
}

/// Handler for POST `/accounts` endpoint.
async fn handle_create_account(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, HttpError> {
    info!(role = %req.role, "Handling create_account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AccountResponse =
        veilingklok_api::create_account(&mut persistence, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/products` endpoint.
async fn handle_register_product(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<ProductResponse>, HttpError> {
    info!(
        supplier_id = req.supplier_id,
        location = %req.location,
        "Handling register_product request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ProductResponse =
        veilingklok_api::register_product(&mut persistence, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/products` endpoint.
async fn handle_list_products(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListProductsRequest>,
) -> Result<Json<Vec<ProductResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let products: Vec<ProductResponse> = veilingklok_api::list_products(&mut persistence, &query)?;
    drop(persistence);

    Ok(Json(products))
}

/// Handler for GET `/products/{product_id}` endpoint.
async fn handle_get_product(
    AxumState(app_state): AxumState<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ProductResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let product: ProductResponse = veilingklok_api::get_product(&mut persistence, product_id)?;
    drop(persistence);

    Ok(Json(product))
}

/// Handler for GET `/products/{product_id}/history` endpoint.
async fn handle_get_product_history(
    AxumState(app_state): AxumState<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<StatusTransitionResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let history: Vec<StatusTransitionResponse> =
        veilingklok_api::get_product_history(&mut persistence, product_id)?;
    drop(persistence);

    Ok(Json(history))
}

/// Handler for POST `/products/{product_id}/schedule` endpoint.
async fn handle_schedule_product(
    AxumState(app_state): AxumState<AppState>,
    Path(product_id): Path<ProductId>,
    Json(req): Json<ScheduleProductRequest>,
) -> Result<Json<ProductResponse>, HttpError> {
    info!(product_id, date = %req.date, "Handling schedule_product request");

    let mut persistence = app_state.persistence.lock().await;
    let product: ProductResponse = veilingklok_api::schedule_product(
        &mut persistence,
        product_id,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::ProductScheduled {
        product_id,
        location: product.location.clone(),
        date: product.scheduled_date.clone().unwrap_or_default(),
    });

    Ok(Json(product))
}

/// Handler for POST `/products/{product_id}/koop` endpoint.
///
/// Sells the lot on the clock to the buyer named by the session layer.
async fn handle_purchase(
    AxumState(app_state): AxumState<AppState>,
    Path(product_id): Path<ProductId>,
    BuyerIdentity(buyer): BuyerIdentity,
    Json(req): Json<PurchaseRequest>,
) -> Result<StatusCode, HttpError> {
    info!(product_id, buyer_id = ?buyer, "Handling purchase request");

    let mut persistence = app_state.persistence.lock().await;
    let sold: ProductResponse = veilingklok_api::purchase(
        &mut persistence,
        product_id,
        buyer,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    if let Some(event) = LiveEvent::lot_sold(&sold) {
        app_state.live.broadcast(&event);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/auctions/start` endpoint.
async fn handle_start_auctions(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<ProductResponse>>, HttpError> {
    info!("Handling start_auctions request");

    let mut persistence = app_state.persistence.lock().await;
    let started: Vec<ProductResponse> = veilingklok_api::start_auctions(
        &mut persistence,
        app_state.clock.as_ref(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::AuctionsStarted {
        product_ids: product_ids(&started),
    });

    Ok(Json(started))
}

/// Handler for POST `/auctions/pause` endpoint.
async fn handle_pause_auctions(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<ProductResponse>>, HttpError> {
    info!("Handling pause_auctions request");

    let mut persistence = app_state.persistence.lock().await;
    let paused: Vec<ProductResponse> =
        veilingklok_api::pause_auctions(&mut persistence, OffsetDateTime::now_utc())?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::AuctionsPaused {
        product_ids: product_ids(&paused),
    });

    Ok(Json(paused))
}

/// Handler for POST `/auctions/resume` endpoint.
async fn handle_resume_auctions(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<ProductResponse>>, HttpError> {
    info!("Handling resume_auctions request");

    let mut persistence = app_state.persistence.lock().await;
    let resumed: Vec<ProductResponse> =
        veilingklok_api::resume_auctions(&mut persistence, OffsetDateTime::now_utc())?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::AuctionsResumed {
        product_ids: product_ids(&resumed),
    });

    Ok(Json(resumed))
}

/// Handler for GET `/auctions/paused` endpoint.
async fn handle_has_paused_auctions(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<HasPausedAuctionsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: HasPausedAuctionsResponse =
        veilingklok_api::has_paused_auctions(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/locations/{location}/advance` endpoint.
async fn handle_advance(
    AxumState(app_state): AxumState<AppState>,
    Path(location): Path<String>,
) -> Result<Json<ProductResponse>, HttpError> {
    let location: Location = location_from_path(&location)?;
    info!(%location, "Handling advance request");

    let mut persistence = app_state.persistence.lock().await;
    let next: ProductResponse = veilingklok_api::advance(
        &mut persistence,
        app_state.clock.as_ref(),
        location,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::LotAdvanced {
        location: next.location.clone(),
        product_id: next.product_id,
    });

    Ok(Json(next))
}

/// Handler for POST `/locations/{location}/open` endpoint.
async fn handle_open_lot(
    AxumState(app_state): AxumState<AppState>,
    Path(location): Path<String>,
) -> Result<Json<ProductResponse>, HttpError> {
    let location: Location = location_from_path(&location)?;
    info!(%location, "Handling open_lot request");

    let mut persistence = app_state.persistence.lock().await;
    let opened: ProductResponse = veilingklok_api::open_lot(
        &mut persistence,
        app_state.clock.as_ref(),
        location,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::LotOpened {
        location: opened.location.clone(),
        product_id: opened.product_id,
    });

    Ok(Json(opened))
}

/// Handler for GET `/locations/{location}/current` endpoint.
async fn handle_current_lot(
    AxumState(app_state): AxumState<AppState>,
    Path(location): Path<String>,
) -> Result<Json<CurrentLotResponse>, HttpError> {
    let location: Location = location_from_path(&location)?;

    let mut persistence = app_state.persistence.lock().await;
    let current: CurrentLotResponse = veilingklok_api::current_lot(
        &mut persistence,
        app_state.clock.as_ref(),
        &app_state.pricing,
        location,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(current))
}

/// Handler for POST `/clock/{location}/reset` endpoint.
#[allow(clippy::unused_async)]
async fn handle_reset_clock(
    AxumState(app_state): AxumState<AppState>,
    Path(location): Path<String>,
) -> Result<Json<ClockResetResponse>, HttpError> {
    let location: Location = location_from_path(&location)?;

    Ok(Json(veilingklok_api::reset_clock(
        app_state.clock.as_ref(),
        location,
        OffsetDateTime::now_utc(),
    )))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/accounts", post(handle_create_account))
        .route(
            "/products",
            post(handle_register_product).get(handle_list_products),
        )
        .route("/products/{product_id}", get(handle_get_product))
        .route(
            "/products/{product_id}/history",
            get(handle_get_product_history),
        )
        .route(
            "/products/{product_id}/schedule",
            post(handle_schedule_product),
        )
        .route("/products/{product_id}/koop", post(handle_purchase))
        .route("/auctions/start", post(handle_start_auctions))
        .route("/auctions/pause", post(handle_pause_auctions))
        .route("/auctions/resume", post(handle_resume_auctions))
        .route("/auctions/paused", get(handle_has_paused_auctions))
        .route("/locations/{location}/advance", post(handle_advance))
        .route("/locations/{location}/open", post(handle_open_lot))
        .route("/locations/{location}/current", get(handle_current_lot))
        .route("/clock/{location}/reset", post(handle_reset_clock))
        .route("/clock", get(clock_ticks_handler))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Veilingklok Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock: Arc::new(ClockBroadcaster::new(OffsetDateTime::now_utc())),
        live: Arc::new(LiveEventBroadcaster::new()),
        pricing: ClockPricing::new(Duration::from_secs(args.clock_duration_secs)),
    };

    let tick_period: Duration = Duration::from_millis(args.tick_interval_ms.max(1));
    tokio::spawn(run_tick_loop(Arc::clone(&app_state.clock), tick_period));

    if args.daily_start {
        tokio::spawn(daily::run_daily_start(app_state.clone()));
    }

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server stopped");
        return Err(e.into());
    }

    Ok(())
}
