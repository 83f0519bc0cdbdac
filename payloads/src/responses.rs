//! Decoders for the response shapes the backend produces.
//!
//! Depending on the endpoint and deployment the backend either returns a
//! payload as-is or wraps it in an envelope. Each shape is decoded here,
//! once, so that callers only ever see the canonical type.

use serde::Deserialize;
use serde::de::Error as _;
use serde::de::DeserializeOwned;

use crate::Booking;

#[derive(Deserialize)]
#[serde(untagged)]
enum ListShape<T> {
    Bare(Vec<T>),
    Data { data: Vec<T> },
    Services { services: Vec<T> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntityShape<T> {
    Data { data: T },
    Bare(T),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReviewShape {
    Wrapped { booking: Booking },
    Bare(Booking),
    Ack { success: bool },
}

/// Outcome of posting a review.
///
/// `booking` is the updated booking when the server returned one; a bare
/// acknowledgement leaves it empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewReceipt {
    pub booking: Option<Booking>,
}

/// Acknowledgement of a delete or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub const OK: Ack = Ack { success: true };
}

/// Decode a sequence that may be bare, under `data`, or under `services`.
pub fn decode_list<T: DeserializeOwned>(
    body: &str,
) -> Result<Vec<T>, serde_json::Error> {
    Ok(match serde_json::from_str(body)? {
        ListShape::Bare(items) => items,
        ListShape::Data { data } => data,
        ListShape::Services { services } => services,
    })
}

/// Decode a single record that may be bare or under `data`.
pub fn decode_entity<T: DeserializeOwned>(
    body: &str,
) -> Result<T, serde_json::Error> {
    Ok(match serde_json::from_str(body)? {
        EntityShape::Data { data } => data,
        EntityShape::Bare(entity) => entity,
    })
}

pub fn decode_review(body: &str) -> Result<ReviewReceipt, serde_json::Error> {
    let booking = match serde_json::from_str(body)? {
        ReviewShape::Wrapped { booking } | ReviewShape::Bare(booking) => {
            Some(booking)
        }
        ReviewShape::Ack { success: true } => None,
        ReviewShape::Ack { success: false } => {
            return Err(serde_json::Error::custom("review was not accepted"));
        }
    };
    Ok(ReviewReceipt { booking })
}
