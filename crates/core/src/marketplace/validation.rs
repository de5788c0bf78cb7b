//! Field validation for incoming marketplace records.
//!
//! Each check collects every failing field, in declaration order, into a
//! single `AppError::Validation`.

use bazaar_shared::{AppError, AppResult, FieldError};
use rust_decimal::Decimal;

use super::types::{NewBooking, NewListing, NewProvider, NewUser};

/// Maximum length of names and titles.
pub const MAX_NAME_LEN: usize = 100;

/// Validates a new user payload.
pub fn validate_new_user(input: &NewUser) -> AppResult<()> {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Please add a name"));
    } else if input.name.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new(
            "name",
            format!("Name can not be more than {MAX_NAME_LEN} characters"),
        ));
    }

    if input.email.trim().is_empty() {
        errors.push(FieldError::new("email", "Please add an email"));
    } else if !is_valid_email(&input.email) {
        errors.push(FieldError::new("email", "Please add a valid email"));
    }

    finish("User validation failed", errors)
}

/// Validates a new provider payload.
pub fn validate_new_provider(input: &NewProvider) -> AppResult<()> {
    let mut errors = Vec::new();

    if input.user_id.trim().is_empty() {
        errors.push(FieldError::new("userId", "Provider must belong to a user"));
    }
    if input.business_name.trim().is_empty() {
        errors.push(FieldError::new("businessName", "Please add a business name"));
    } else if input.business_name.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new(
            "businessName",
            format!("Business name can not be more than {MAX_NAME_LEN} characters"),
        ));
    }

    finish("Provider validation failed", errors)
}

/// Validates a new listing payload.
pub fn validate_new_listing(input: &NewListing) -> AppResult<()> {
    let mut errors = Vec::new();

    if input.provider_id.trim().is_empty() {
        errors.push(FieldError::new("providerId", "Listing must belong to a provider"));
    }
    if input.title.trim().is_empty() {
        errors.push(FieldError::new("title", "Please add a title"));
    } else if input.title.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new(
            "title",
            format!("Title can not be more than {MAX_NAME_LEN} characters"),
        ));
    }
    match input.price {
        None => errors.push(FieldError::new("price", "Please add a price")),
        Some(price) if price < Decimal::ZERO => {
            errors.push(FieldError::new("price", "Price can not be negative"));
        }
        Some(_) => {}
    }

    finish("Listing validation failed", errors)
}

/// Validates a new booking payload.
pub fn validate_new_booking(input: &NewBooking) -> AppResult<()> {
    let mut errors = Vec::new();

    if input.user_id.trim().is_empty() {
        errors.push(FieldError::new("userId", "Booking must belong to a user"));
    }
    if input.listing_id.trim().is_empty() {
        errors.push(FieldError::new("listingId", "Booking must reference a listing"));
    }
    if let Some(amount) = input.amount
        && amount <= Decimal::ZERO
    {
        errors.push(FieldError::new("amount", "Amount must be greater than zero"));
    }

    finish("Booking validation failed", errors)
}

fn finish(message: &str, errors: Vec<FieldError>) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(message, errors))
    }
}

/// Minimal structural email check: one `@`, non-empty local part, dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
