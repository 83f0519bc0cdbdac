//! Wire types and the HTTP client for the HomeHero marketplace API.
//!
//! Everything that crosses the network lives here: the entity records, the
//! request bodies and query filters, the response decoders, and the
//! [`APIClient`] with its per-resource accessors. The persisted client state
//! (the bearer token) and the seams the client reports through
//! ([`Notifier`], [`Navigator`]) are defined here as well so that the client
//! can be constructed without any UI.

pub mod accessors;
pub mod api_client;
pub mod demo;
pub mod events;
pub mod requests;
pub mod responses;
pub mod storage;

pub use accessors::{BookingsAPI, ServicesAPI, UsersAPI};
pub use api_client::{APIClient, ClientError, Sourced};
pub use events::{Navigator, Notice, NoticeKind, Notifier, Silent};
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, StorageError, TokenStore,
};

use derive_more::Display;
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Categories offered by the listing form. The wire format keeps categories
/// as free text, so services may carry values outside this list.
pub const SERVICE_CATEGORIES: [&str; 10] = [
    "Plumber",
    "Electrician",
    "Cleaner",
    "Carpenter",
    "Painter",
    "Gardener",
    "Technician",
    "Installation",
    "Security",
    "Other",
];

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ServiceId(pub String);

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct BookingId(pub String);

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<&str> for ServiceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for BookingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A service listing published by a provider.
///
/// The backend has used more than one spelling for some fields over time,
/// so the older names are accepted when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id", alias = "id")]
    pub id: ServiceId,
    #[serde(alias = "serviceName")]
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "image", default)]
    pub image_url: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(alias = "email", default)]
    pub provider_email: String,
    /// Average rating in `[0, 5]`.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Service {
    /// Mean of the ratings in `reviews`, if there are any.
    pub fn average_review_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        Some(f64::from(total) / self.reviews.len() as f64)
    }
}

/// A review attached to a completed booking. Ratings are 1 to 5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub rating: u8,
    pub comment: String,
    pub created_at: Timestamp,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    #[display("pending")]
    Pending,
    #[display("confirmed")]
    Confirmed,
    #[display("in-progress")]
    InProgress,
    #[display("completed")]
    Completed,
    #[display("cancelled")]
    Cancelled,
}

impl BookingStatus {
    /// Position in the pending → confirmed → in-progress → completed
    /// sequence. Cancelled sits outside of it.
    fn stage(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::InProgress => Some(2),
            Self::Completed => Some(3),
            Self::Cancelled => None,
        }
    }

    pub fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether the server may move a booking from `self` to `next`.
    ///
    /// Statuses only move forward, and cancellation is only possible before
    /// work has started.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        match (self.stage(), next.stage()) {
            (Some(_), None) => self.can_cancel(),
            (Some(from), Some(to)) => to > from,
            (None, _) => false,
        }
    }
}

/// A customer's booking of a service.
///
/// `service_name`, `price` and `provider_email` are copied from the service
/// when the booking is made and are not kept in sync with it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: BookingId,
    pub service_id: ServiceId,
    #[serde(default)]
    pub service_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub provider_email: String,
    pub booking_date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
    pub created_at: Timestamp,
}

impl Booking {
    pub fn can_cancel(&self) -> bool {
        self.status.can_cancel()
    }

    /// A review can be left once, after the work is completed.
    pub fn can_review(&self) -> bool {
        self.status == BookingStatus::Completed && self.review.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(
        default,
        alias = "photoURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_url: Option<String>,
}

/// Dashboard numbers for a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStats {
    #[serde(default)]
    pub total_services: u32,
    #[serde(default)]
    pub total_bookings: u32,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}
