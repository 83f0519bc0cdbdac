//! Realistic data for the mock backend.
//!
//! Used by the dev server and the integration tests. It covers:
//! - the ten sample service listings (exactly one Plumber)
//! - a signed-in customer with one booking in every status, one of them
//!   already reviewed
//! - a second customer whose booking must never show up for the first
//! - a provider account owning the first listing

use jiff::{Timestamp, ToSpan};
use payloads::{
    Booking, BookingId, BookingStatus, Review, Service, UserProfile, demo,
};
use tracing::info;

use crate::backend::MockBackend;

pub const CUSTOMER_TOKEN: &str = "customer-token";
pub const CUSTOMER_EMAIL: &str = "customer@homehero.com";
pub const OTHER_CUSTOMER_TOKEN: &str = "other-customer-token";
pub const OTHER_CUSTOMER_EMAIL: &str = "other@homehero.com";
pub const PROVIDER_TOKEN: &str = "provider-token";

pub const PENDING_BOOKING: &str = "booking-pending";
pub const CONFIRMED_BOOKING: &str = "booking-confirmed";
pub const IN_PROGRESS_BOOKING: &str = "booking-in-progress";
pub const COMPLETED_BOOKING: &str = "booking-completed";
pub const REVIEWED_BOOKING: &str = "booking-reviewed";
pub const CANCELLED_BOOKING: &str = "booking-cancelled";
pub const OTHER_CUSTOMER_BOOKING: &str = "booking-other-customer";

/// Everything seeded into a backend by [`Dataset::seed`].
pub struct Dataset {
    pub services: Vec<Service>,
    pub customer: UserProfile,
    pub provider: UserProfile,
}

impl Dataset {
    pub fn seed(backend: &MockBackend) -> Self {
        let services = demo::services();
        for service in &services {
            backend.insert_service(service.clone());
        }

        let customer = UserProfile {
            name: "Casey Customer".into(),
            email: CUSTOMER_EMAIL.into(),
            photo_url: None,
        };
        let provider = UserProfile {
            name: services[0].provider_name.clone(),
            email: services[0].provider_email.clone(),
            photo_url: None,
        };
        backend.add_account(CUSTOMER_TOKEN, customer.clone());
        backend.add_account(
            OTHER_CUSTOMER_TOKEN,
            UserProfile {
                name: "Olive Other".into(),
                email: OTHER_CUSTOMER_EMAIL.into(),
                photo_url: None,
            },
        );
        backend.add_account(PROVIDER_TOKEN, provider.clone());

        let now = Timestamp::now();
        let upcoming = now + 72.hours();
        let past = now - 240.hours();
        let customer_bookings = [
            (PENDING_BOOKING, 1, BookingStatus::Pending, upcoming),
            (CONFIRMED_BOOKING, 2, BookingStatus::Confirmed, upcoming),
            (IN_PROGRESS_BOOKING, 3, BookingStatus::InProgress, now),
            (COMPLETED_BOOKING, 0, BookingStatus::Completed, past),
            (REVIEWED_BOOKING, 4, BookingStatus::Completed, past),
            (CANCELLED_BOOKING, 5, BookingStatus::Cancelled, upcoming),
        ];
        for (id, service, status, date) in customer_bookings {
            let mut entry = booking(id, &services[service], status, date);
            if id == REVIEWED_BOOKING {
                entry.review = Some(Review {
                    rating: 4,
                    comment: "Quick and tidy".into(),
                    created_at: past + 24.hours(),
                });
            }
            backend.insert_booking(CUSTOMER_EMAIL, entry);
        }
        backend.insert_booking(
            OTHER_CUSTOMER_EMAIL,
            booking(
                OTHER_CUSTOMER_BOOKING,
                &services[0],
                BookingStatus::Pending,
                upcoming,
            ),
        );

        Self {
            services,
            customer,
            provider,
        }
    }

    pub fn print_summary(&self) {
        info!("📋 Seeded data:");
        info!("   {} services", self.services.len());
        info!("   customer {} (token {CUSTOMER_TOKEN})", self.customer.email);
        info!("   provider {} (token {PROVIDER_TOKEN})", self.provider.email);
        info!("   bookings in every status for the customer");
    }
}

fn booking(
    id: &str,
    service: &Service,
    status: BookingStatus,
    booking_date: Timestamp,
) -> Booking {
    Booking {
        id: BookingId::from(id),
        service_id: service.id.clone(),
        service_name: service.name.clone(),
        price: service.price,
        provider_email: service.provider_email.clone(),
        booking_date,
        special_requests: None,
        status,
        review: None,
        created_at: booking_date - 48.hours(),
    }
}
