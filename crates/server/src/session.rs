// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Buyer identity extraction.
//!
//! Login and sessions are handled upstream. The session layer forwards the
//! authenticated account id in the `X-Account-Id` header, and this
//! extractor hands it to the purchase operation, which checks that the
//! account exists and is a buyer.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use tracing::{debug, warn};
use veilingklok_domain::AccountId;

use crate::HttpError;

/// Header carrying the authenticated account id.
pub const ACCOUNT_ID_HEADER: &str = "X-Account-Id";

/// The caller's account id, if the session layer supplied one.
///
/// A missing header yields `BuyerIdentity(None)` so the purchase operation
/// reports it as `Unauthorized` alongside its other identity checks.
///
/// # Errors
///
/// Rejects with 401 if the header is present but not an account id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyerIdentity(pub Option<AccountId>);

impl<S> FromRequestParts<S> for BuyerIdentity
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACCOUNT_ID_HEADER) else {
            debug!("No account id header on request");
            return Ok(Self(None));
        };

        let account_id: AccountId = value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<AccountId>().ok())
            .ok_or_else(|| {
                warn!("Malformed account id header");
                HttpError {
                    status: StatusCode::UNAUTHORIZED,
                    message: format!("Invalid {ACCOUNT_ID_HEADER} header"),
                }
            })?;

        Ok(Self(Some(account_id)))
    }
}
