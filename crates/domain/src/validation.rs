// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::NewProduct;
use time::Date;
use time::macros::format_description;

/// Longest accepted product or account name, in characters.
const MAX_NAME_LENGTH: usize = 200;

/// Validates that a submitted product's field constraints are met.
///
/// # Arguments
///
/// * `product` - The product to validate
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty or longer than 200 characters
/// - The quantity is zero
/// - The starting price is zero
/// - The minimum price is above the starting price
pub fn validate_new_product(product: &NewProduct) -> Result<(), DomainError> {
    let name: &str = product.name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidProduct {
            field: "name",
            message: String::from("Name cannot be empty"),
        });
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidProduct {
            field: "name",
            message: format!("Name cannot exceed {MAX_NAME_LENGTH} characters"),
        });
    }

    if product.quantity == 0 {
        return Err(DomainError::InvalidProduct {
            field: "quantity",
            message: String::from("Quantity must be greater than 0"),
        });
    }

    if product.starting_price.cents() == 0 {
        return Err(DomainError::InvalidProduct {
            field: "starting_price",
            message: String::from("Starting price must be greater than 0"),
        });
    }

    // The clock runs downward, so it must start at or above the floor
    if product.minimum_price > product.starting_price {
        return Err(DomainError::InvalidProduct {
            field: "minimum_price",
            message: format!(
                "Minimum price {} exceeds starting price {}",
                product.minimum_price, product.starting_price
            ),
        });
    }

    Ok(())
}

/// Validates an account display name.
///
/// # Errors
///
/// Returns an error if the name is empty or too long.
pub fn validate_account_name(name: &str) -> Result<(), DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidAccountName(String::from(
            "Name cannot be empty",
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidAccountName(format!(
            "Name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS.uuuuuu` (UTC).
#[must_use]
pub fn format_timestamp(at: time::OffsetDateTime) -> String {
    let utc: time::OffsetDateTime = at.to_offset(time::UtcOffset::UTC);
    utc.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]"
    ))
    .unwrap_or_else(|_| utc.unix_timestamp().to_string())
}
