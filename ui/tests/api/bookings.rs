use payloads::requests::NewReview;
use payloads::{BookingId, BookingStatus};
use reqwest::StatusCode;
use test_helpers::mock::{
    CANCELLED_BOOKING, COMPLETED_BOOKING, CONFIRMED_BOOKING, CUSTOMER_EMAIL,
    OTHER_CUSTOMER_BOOKING, PENDING_BOOKING, REVIEWED_BOOKING,
};
use test_helpers::{assert_status_code, new_booking, spawn_app};

#[tokio::test]
async fn my_bookings_only_shows_own() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();

    let mine = app.client().bookings().my_bookings().await?.into_inner();
    assert_eq!(mine.len(), 6);
    assert!(
        mine.iter()
            .all(|b| b.id != BookingId::from(OTHER_CUSTOMER_BOOKING))
    );

    let all = app.client().bookings().list().await?.into_inner();
    assert_eq!(all.len(), 7);

    let request = app.backend.last_request().unwrap();
    assert_eq!(request.authorization.as_deref(), Some("Bearer customer-token"));

    Ok(())
}

#[tokio::test]
async fn bookings_require_sign_in() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = app.client().bookings().my_bookings().await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn create_booking_starts_pending() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let service = &app.dataset.services[2];

    let booking = app
        .client()
        .bookings()
        .create(&new_booking(service))
        .await?
        .into_inner();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.service_id, service.id);
    assert_eq!(booking.price, service.price);
    assert_eq!(booking.special_requests.as_deref(), Some("Please ring twice"));

    let mine = app.client().bookings().my_bookings().await?.into_inner();
    assert_eq!(mine.len(), 7);
    assert_eq!(mine[0].id, booking.id);
    assert!(app.backend.booking(&booking.id).is_some());

    Ok(())
}

#[tokio::test]
async fn cancel_pending_booking() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let bookings = app.client().bookings();

    let ack = bookings
        .cancel(&BookingId::from(PENDING_BOOKING))
        .await?
        .into_inner();
    assert!(ack.success);
    assert!(app.backend.booking(&BookingId::from(PENDING_BOOKING)).is_none());

    let completed = bookings.cancel(&BookingId::from(COMPLETED_BOOKING)).await;
    assert_status_code(completed, StatusCode::BAD_REQUEST);
    let cancelled = bookings.cancel(&BookingId::from(CANCELLED_BOOKING)).await;
    assert_status_code(cancelled, StatusCode::BAD_REQUEST);

    // rejected requests are not toasted
    assert!(app.toasts().is_empty());

    Ok(())
}

#[tokio::test]
async fn started_work_cannot_be_cancelled() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let id = BookingId::from(CONFIRMED_BOOKING);

    assert!(app.backend.set_booking_status(&id, BookingStatus::InProgress));
    // statuses never move backwards
    assert!(!app.backend.set_booking_status(&id, BookingStatus::Pending));

    let result = app.client().bookings().cancel(&id).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);
    assert_eq!(
        app.backend.booking(&id).map(|b| b.status),
        Some(BookingStatus::InProgress)
    );

    Ok(())
}

#[tokio::test]
async fn review_completed_booking_once() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let bookings = app.client().bookings();
    let id = BookingId::from(COMPLETED_BOOKING);
    let review = NewReview {
        rating: 5,
        comment: "Fixed the wiring in an hour".into(),
    };

    let receipt = bookings.add_review(&id, &review).await?.into_inner();
    let booking = receipt.booking.unwrap();
    assert_eq!(booking.id, id);
    assert_eq!(booking.status, BookingStatus::Completed);
    assert_eq!(booking.review.as_ref().map(|r| r.rating), Some(5));

    // the listing picks up the review
    let service = app.backend.service(&booking.service_id).unwrap();
    assert_eq!(service.review_count, 1);
    assert_eq!(service.rating, 5.0);

    assert_status_code(
        bookings.add_review(&id, &review).await,
        StatusCode::BAD_REQUEST,
    );
    assert_status_code(
        bookings
            .add_review(&BookingId::from(REVIEWED_BOOKING), &review)
            .await,
        StatusCode::BAD_REQUEST,
    );
    assert_status_code(
        bookings
            .add_review(&BookingId::from(PENDING_BOOKING), &review)
            .await,
        StatusCode::BAD_REQUEST,
    );

    Ok(())
}

#[tokio::test]
async fn other_customers_cannot_see_bookings() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_with(test_helpers::mock::OTHER_CUSTOMER_TOKEN);

    let theirs = app.client().bookings().my_bookings().await?.into_inner();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].id, BookingId::from(OTHER_CUSTOMER_BOOKING));
    assert!(theirs.iter().all(|b| b.provider_email != CUSTOMER_EMAIL));

    Ok(())
}
