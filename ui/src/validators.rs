//! Form validation run before any request is sent.

use std::collections::BTreeMap;
use std::fmt;

use jiff::Timestamp;
use payloads::requests::{NewBooking, NewReview, ServiceDraft};
use rust_decimal::Decimal;

pub const PASSWORD_MIN_LEN: usize = 6;

/// Field name → message for every field that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.messages().collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Something shaped like `local@domain.tld` with no whitespace.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // the last dot must have something on both sides
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Returns the first rule the password breaks.
pub fn validate_password(password: &str) -> Option<&'static str> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Some("Password must be at least 6 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least one uppercase letter");
    }
    None
}

pub fn validate_service(draft: &ServiceDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if draft.name.trim().is_empty() {
        errors.add("name", "Service name is required");
    }
    if draft.category.trim().is_empty() {
        errors.add("category", "Category is required");
    }
    if draft.price <= Decimal::ZERO {
        errors.add("price", "Valid price is required");
    }
    if draft.description.trim().is_empty() {
        errors.add("description", "Description is required");
    }
    if draft.image_url.trim().is_empty() {
        errors.add("imageUrl", "Image URL is required");
    }
    errors.into_result()
}

/// `customer_email` is the signed-in user, who may not book their own
/// service.
pub fn validate_booking(
    booking: &NewBooking,
    now: Timestamp,
    customer_email: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if booking.booking_date < now {
        errors.add("bookingDate", "Booking date cannot be in the past");
    }
    if let Some(email) = customer_email
        && !booking.provider_email.is_empty()
        && email.eq_ignore_ascii_case(&booking.provider_email)
    {
        errors.add("serviceId", "You cannot book your own service");
    }
    errors.into_result()
}

pub fn validate_review(review: &NewReview) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if !(1..=5).contains(&review.rating) {
        errors.add("rating", "Rating must be between 1 and 5");
    }
    errors.into_result()
}
