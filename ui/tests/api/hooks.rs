use std::time::Duration;

use jiff::{Timestamp, ToSpan};
use payloads::events::SERVER_ERROR;
use payloads::requests::{NewBooking, NewReview, ServiceDraft, ServiceFilters};
use payloads::{BookingId, BookingStatus};
use rust_decimal::dec;
use test_helpers::mock::{
    COMPLETED_BOOKING, CUSTOMER_EMAIL, PENDING_BOOKING, REVIEWED_BOOKING,
};
use test_helpers::{new_booking, offline_context, service_draft, spawn_app};
use ui::hooks::HookError;

fn five_stars() -> NewReview {
    NewReview {
        rating: 5,
        comment: "Spotless".into(),
    }
}

#[tokio::test]
async fn services_hook_loads_on_mount() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let hook = app.context.services(ServiceFilters::default()).await;
    let snapshot = hook.snapshot();
    assert_eq!(snapshot.items.len(), 10);
    assert!(!snapshot.is_loading);
    assert!(!snapshot.is_demo);
    assert_eq!(snapshot.error, None);

    // refetching is idempotent
    hook.refetch().await?;
    assert_eq!(hook.snapshot(), snapshot);

    // one sample uses a category outside the standard list
    let categories = hook.categories();
    assert_eq!(categories.len(), 11);
    assert_eq!(categories.last().map(String::as_str), Some("Pest Control"));

    Ok(())
}

#[tokio::test]
async fn services_hook_filters() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let hook = app.context.services(ServiceFilters::default()).await;

    hook.set_filters(ServiceFilters::by_category("Plumber"))
        .await?;
    assert_eq!(hook.services().len(), 1);

    let requests = app.backend.requests().len();
    hook.set_filters(ServiceFilters::by_category("Plumber"))
        .await?;
    assert_eq!(app.backend.requests().len(), requests);

    Ok(())
}

#[tokio::test]
async fn services_hook_last_filter_wins() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let hook = app.context.services(ServiceFilters::default()).await;

    // the first request is only answered after the second
    let release = app.backend.hold_next();
    let issued = app.backend.requests().len();
    let (slow, fast) = tokio::join!(
        hook.set_filters(ServiceFilters::by_category("Cleaner")),
        async {
            while app.backend.requests().len() == issued {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            let result = hook
                .set_filters(ServiceFilters::by_category("Technician"))
                .await;
            release.notify_one();
            result
        }
    );
    slow?;
    fast?;

    let snapshot = hook.snapshot();
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.items.len(), 2);
    assert!(snapshot.items.iter().all(|s| s.category == "Technician"));

    Ok(())
}

#[tokio::test]
async fn services_hook_applies_writes_locally() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let hook = app.context.services(ServiceFilters::default()).await;
    let before = hook.services();

    // update replaces in place
    let target = before[4].clone();
    let draft = ServiceDraft {
        price: dec!(999),
        ..ServiceDraft::from(&target)
    };
    let updated = hook.update_service(&target.id, &draft).await?;
    let after = hook.services();
    assert_eq!(after.len(), before.len());
    for (i, service) in after.iter().enumerate() {
        if i == 4 {
            assert_eq!(service, &updated);
            assert_eq!(service.price, dec!(999));
        } else {
            assert_eq!(service, &before[i]);
        }
    }

    // create prepends
    let created = hook.create_service(&service_draft()).await?;
    let after = hook.services();
    assert_eq!(after.len(), 11);
    assert_eq!(after[0], created);
    assert!(before.iter().all(|s| s.id != created.id));

    // delete removes
    hook.delete_service(&target.id).await?;
    assert_eq!(hook.services().len(), 10);
    assert!(hook.get(&target.id).is_none());

    assert!(app.toasts().contains(&"Service deleted successfully".into()));

    Ok(())
}

#[tokio::test]
async fn services_hook_validates_before_sending() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let hook = app.context.services(ServiceFilters::default()).await;
    let requests = app.backend.requests().len();

    let draft = ServiceDraft {
        name: "  ".into(),
        price: dec!(0),
        ..service_draft()
    };
    let Err(HookError::Validation(errors)) = hook.create_service(&draft).await
    else {
        panic!("expected a validation error");
    };
    assert_eq!(errors.get("name"), Some("Service name is required"));
    assert_eq!(errors.get("price"), Some("Valid price is required"));
    assert_eq!(app.backend.requests().len(), requests);
    assert_eq!(hook.services().len(), 10);

    let toasts = app.toasts();
    assert!(toasts.contains(&"Service name is required".into()));
    assert!(toasts.contains(&"Valid price is required".into()));

    Ok(())
}

#[tokio::test]
async fn services_hook_keeps_items_on_failure() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let hook = app.context.services(ServiceFilters::default()).await;
    app.backend.fail_next(500);

    assert!(hook.refetch().await.is_err());

    let snapshot = hook.snapshot();
    assert_eq!(snapshot.items.len(), 10);
    assert!(snapshot.error.is_some());
    assert!(!snapshot.is_loading);
    assert_eq!(
        app.toasts(),
        vec![
            SERVER_ERROR.to_string(),
            "Failed to fetch services".to_string()
        ]
    );

    Ok(())
}

#[tokio::test]
async fn bookings_hook_cancel() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let hook = app.context.bookings(Some(CUSTOMER_EMAIL.into())).await;
    assert_eq!(hook.bookings().len(), 6);

    hook.cancel_booking(&BookingId::from(PENDING_BOOKING)).await?;
    assert_eq!(hook.bookings().len(), 5);
    assert!(hook.get(&BookingId::from(PENDING_BOOKING)).is_none());

    let requests = app.backend.requests().len();
    let result = hook
        .cancel_booking(&BookingId::from(COMPLETED_BOOKING))
        .await;
    assert!(matches!(result, Err(HookError::NotAllowed(_))));
    assert_eq!(app.backend.requests().len(), requests);
    assert_eq!(hook.bookings().len(), 5);

    Ok(())
}

#[tokio::test]
async fn bookings_hook_review() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let hook = app.context.bookings(Some(CUSTOMER_EMAIL.into())).await;
    let id = BookingId::from(COMPLETED_BOOKING);

    let reviewed = hook.add_review(&id, &five_stars()).await?.unwrap();
    assert_eq!(reviewed.status, BookingStatus::Completed);
    assert_eq!(reviewed.review.as_ref().map(|r| r.rating), Some(5));
    assert_eq!(hook.get(&id), Some(reviewed));

    let again = hook.add_review(&id, &five_stars()).await;
    assert!(matches!(again, Err(HookError::NotAllowed(_))));
    let done = hook
        .add_review(&BookingId::from(REVIEWED_BOOKING), &five_stars())
        .await;
    assert!(matches!(done, Err(HookError::NotAllowed(_))));

    let zero = NewReview {
        rating: 0,
        comment: String::new(),
    };
    let invalid = hook
        .add_review(&BookingId::from(COMPLETED_BOOKING), &zero)
        .await;
    assert!(matches!(invalid, Err(HookError::Validation(_))));

    Ok(())
}

#[tokio::test]
async fn bookings_hook_refused_review() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let hook = app.context.bookings(Some(CUSTOMER_EMAIL.into())).await;
    let id = BookingId::from(COMPLETED_BOOKING);
    app.backend.refuse_reviews(true);

    let result = hook.add_review(&id, &five_stars()).await;
    assert!(matches!(result, Err(HookError::Client(_))));
    assert_eq!(hook.get(&id).unwrap().review, None);
    assert_eq!(app.toasts(), vec!["Failed to add review".to_string()]);

    Ok(())
}

#[tokio::test]
async fn bookings_hook_create() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let hook = app.context.bookings(Some(CUSTOMER_EMAIL.into())).await;
    let service = &app.dataset.services[6];

    let created = hook.create_booking(&new_booking(service)).await?;
    assert_eq!(created.status, BookingStatus::Pending);
    assert_eq!(hook.bookings()[0], created);
    assert_eq!(hook.bookings().len(), 7);

    let requests = app.backend.requests().len();
    let past = NewBooking::for_service(
        service,
        Timestamp::now() - 24.hours(),
        None,
    );
    let Err(HookError::Validation(errors)) = hook.create_booking(&past).await
    else {
        panic!("expected a validation error");
    };
    assert_eq!(
        errors.get("bookingDate"),
        Some("Booking date cannot be in the past")
    );
    assert_eq!(app.backend.requests().len(), requests);

    Ok(())
}

#[tokio::test]
async fn providers_cannot_book_themselves() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_provider();
    let email = app.dataset.provider.email.to_uppercase();
    let hook = app.context.bookings(Some(email)).await;
    let requests = app.backend.requests().len();

    let own = new_booking(&app.dataset.services[0]);
    let Err(HookError::Validation(errors)) = hook.create_booking(&own).await
    else {
        panic!("expected a validation error");
    };
    assert_eq!(
        errors.get("serviceId"),
        Some("You cannot book your own service")
    );
    assert_eq!(app.backend.requests().len(), requests);
    assert!(
        app.toasts()
            .contains(&"You cannot book your own service".into())
    );

    Ok(())
}

#[tokio::test]
async fn offline_review_is_attached_locally() -> anyhow::Result<()> {
    let context = offline_context(true);
    let hook = context.bookings(None).await;
    assert!(hook.snapshot().is_demo);
    let id = BookingId::from("demo-booking-3");

    let reviewed = hook.add_review(&id, &five_stars()).await?.unwrap();
    let review = reviewed.review.unwrap();
    assert_eq!(review.rating, 5);
    assert_eq!(review.comment, "Spotless");
    assert!(hook.get(&id).unwrap().review.is_some());
    assert!(
        context
            .toasts
            .messages()
            .contains(&"Review added successfully".into())
    );

    Ok(())
}
