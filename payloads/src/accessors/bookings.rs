use crate::requests::{NewBooking, NewReview};
use crate::responses::{
    Ack, ReviewReceipt, decode_entity, decode_list, decode_review,
};
use crate::{APIClient, Booking, BookingId, ClientError, Sourced, demo};

pub struct BookingsAPI<'a> {
    pub(crate) client: &'a APIClient,
}

impl BookingsAPI<'_> {
    /// Every booking visible to the current user.
    pub async fn list(&self) -> Result<Sourced<Vec<Booking>>, ClientError> {
        let result = self.fetch_list("bookings").await;
        self.client
            .or_fallback("fetching bookings", result, demo::bookings)
    }

    /// Bookings made by the current user.
    pub async fn my_bookings(
        &self,
    ) -> Result<Sourced<Vec<Booking>>, ClientError> {
        let result = self.fetch_list("bookings/my-bookings").await;
        self.client
            .or_fallback("fetching my bookings", result, demo::bookings)
    }

    pub async fn create(
        &self,
        booking: &NewBooking,
    ) -> Result<Sourced<Booking>, ClientError> {
        let result = self.send_create(booking).await;
        self.client.or_fallback("creating booking", result, || {
            demo::created_booking(booking)
        })
    }

    /// Cancel a booking. The backend drops it from the customer's bookings.
    pub async fn cancel(
        &self,
        id: &BookingId,
    ) -> Result<Sourced<Ack>, ClientError> {
        let result = self
            .client
            .delete(&format!("bookings/{id}"))
            .await
            .map(|_| Ack::OK);
        self.client.or_fallback("cancelling booking", result, || Ack::OK)
    }

    pub async fn add_review(
        &self,
        id: &BookingId,
        review: &NewReview,
    ) -> Result<Sourced<ReviewReceipt>, ClientError> {
        let result = self.send_review(id, review).await;
        self.client.or_fallback("adding review", result, || ReviewReceipt {
            booking: None,
        })
    }

    async fn fetch_list(
        &self,
        path: &str,
    ) -> Result<Vec<Booking>, ClientError> {
        let body = self.client.get(path).await?;
        Ok(decode_list(&body)?)
    }

    async fn send_create(
        &self,
        booking: &NewBooking,
    ) -> Result<Booking, ClientError> {
        let body = self.client.post("bookings", booking).await?;
        Ok(decode_entity(&body)?)
    }

    async fn send_review(
        &self,
        id: &BookingId,
        review: &NewReview,
    ) -> Result<ReviewReceipt, ClientError> {
        let body = self
            .client
            .post(&format!("bookings/{id}/review"), review)
            .await?;
        Ok(decode_review(&body)?)
    }
}
