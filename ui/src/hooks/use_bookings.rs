use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jiff::Timestamp;
use payloads::requests::{NewBooking, NewReview};
use payloads::{APIClient, Booking, BookingId, Notice, Notifier, Review};

use super::{Collection, CollectionSnapshot, HookError};
use crate::validators::{ValidationErrors, validate_booking, validate_review};

const CANCEL_NOT_ALLOWED: &str =
    "Only pending or confirmed bookings can be cancelled";
const REVIEW_NOT_ALLOWED: &str =
    "Only completed bookings without a review can be reviewed";

/// The signed-in customer's bookings.
pub struct BookingsHook {
    client: Arc<APIClient>,
    notifier: Arc<dyn Notifier>,
    /// Used to stop customers booking their own services.
    customer_email: Option<String>,
    state: Mutex<Collection<Booking>>,
}

/// Create the hook and run its first fetch.
pub async fn use_bookings(
    client: Arc<APIClient>,
    notifier: Arc<dyn Notifier>,
    customer_email: Option<String>,
) -> BookingsHook {
    let hook = BookingsHook {
        client,
        notifier,
        customer_email,
        state: Mutex::new(Collection::default()),
    };
    // failures are kept in the hook state
    let _ = hook.refetch().await;
    hook
}

impl BookingsHook {
    fn state(&self) -> MutexGuard<'_, Collection<Booking>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> CollectionSnapshot<Booking> {
        self.state().snapshot()
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.state().items().to_vec()
    }

    pub fn get(&self, id: &BookingId) -> Option<Booking> {
        self.state().get(id).cloned()
    }

    pub async fn refetch(&self) -> Result<(), HookError> {
        let generation = self.state().begin_fetch();
        tracing::debug!(generation, "fetching bookings");

        match self.client.bookings().my_bookings().await {
            Ok(bookings) => {
                self.state().finish_fetch(generation, Ok(bookings));
                Ok(())
            }
            Err(e) => {
                let current =
                    self.state().finish_fetch(generation, Err(e.to_string()));
                if current {
                    self.notifier
                        .notify(Notice::error("Failed to fetch bookings"));
                }
                Err(e.into())
            }
        }
    }

    fn reject(&self, errors: ValidationErrors) -> HookError {
        for message in errors.messages() {
            self.notifier.notify(Notice::error(message));
        }
        errors.into()
    }

    fn not_allowed(&self, message: &str) -> HookError {
        self.notifier.notify(Notice::error(message));
        HookError::NotAllowed(message.to_string())
    }

    /// Book a service. Dates in the past and the customer's own services
    /// are rejected before anything is sent.
    pub async fn create_booking(
        &self,
        booking: &NewBooking,
    ) -> Result<Booking, HookError> {
        validate_booking(
            booking,
            Timestamp::now(),
            self.customer_email.as_deref(),
        )
        .map_err(|errors| self.reject(errors))?;

        match self.client.bookings().create(booking).await {
            Ok(created) => {
                let booking = created.into_inner();
                self.state().prepend(booking.clone());
                self.notifier
                    .notify(Notice::success("Booking created successfully"));
                Ok(booking)
            }
            Err(e) => {
                self.notifier
                    .notify(Notice::error("Failed to create booking"));
                Err(e.into())
            }
        }
    }

    /// Cancel a pending or confirmed booking and drop it from the list.
    pub async fn cancel_booking(
        &self,
        id: &BookingId,
    ) -> Result<(), HookError> {
        let cancellable = self.state().get(id).map(Booking::can_cancel);
        if cancellable == Some(false) {
            return Err(self.not_allowed(CANCEL_NOT_ALLOWED));
        }

        match self.client.bookings().cancel(id).await {
            Ok(_) => {
                self.state().remove(id);
                self.notifier
                    .notify(Notice::success("Booking cancelled successfully"));
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify(Notice::error("Failed to cancel booking"));
                Err(e.into())
            }
        }
    }

    /// Review a completed booking. Returns the booking as now cached.
    pub async fn add_review(
        &self,
        id: &BookingId,
        review: &NewReview,
    ) -> Result<Option<Booking>, HookError> {
        validate_review(review).map_err(|errors| self.reject(errors))?;
        let reviewable = self.state().get(id).map(Booking::can_review);
        if reviewable == Some(false) {
            return Err(self.not_allowed(REVIEW_NOT_ALLOWED));
        }

        let receipt = match self.client.bookings().add_review(id, review).await
        {
            Ok(receipt) => receipt.into_inner(),
            Err(e) => {
                self.notifier.notify(Notice::error("Failed to add review"));
                return Err(e.into());
            }
        };

        let updated = {
            let mut state = self.state();
            match receipt.booking {
                Some(booking) => {
                    state.replace(id, booking.clone());
                    Some(booking)
                }
                None => {
                    // no booking came back, attach the review ourselves
                    state.get_mut(id).map(|booking| {
                        booking.review = Some(Review {
                            rating: review.rating,
                            comment: review.comment.clone(),
                            created_at: Timestamp::now(),
                        });
                        booking.clone()
                    })
                }
            }
        };
        self.notifier
            .notify(Notice::success("Review added successfully"));
        Ok(updated)
    }
}
