use payloads::events::SERVER_ERROR;
use payloads::requests::{NewReview, ProfileUpdate, ServiceFilters};
use payloads::{BookingId, ClientError, ProviderStats, ServiceId};
use test_helpers::{
    new_booking, offline_context, service_draft, spawn_app_with,
};

#[tokio::test]
async fn offline_demo_mode_serves_samples() -> anyhow::Result<()> {
    let context = offline_context(true);
    let services = context.client.services();

    let all = services.list(&ServiceFilters::default()).await?;
    assert!(all.is_fallback());
    assert_eq!(all.as_inner().len(), 10);

    // filters still apply to the samples
    let plumbers = services
        .list(&ServiceFilters::by_category("Plumber"))
        .await?
        .into_inner();
    assert_eq!(plumbers.len(), 1);

    let first = all.into_inner().remove(0);
    let unknown = services.get(&ServiceId::from("no-such-service")).await?;
    assert!(unknown.is_fallback());
    assert_eq!(unknown.into_inner().id, first.id);

    Ok(())
}

#[tokio::test]
async fn offline_writes_get_unique_ids() -> anyhow::Result<()> {
    let context = offline_context(true);
    let services = context.client.services();

    let a = services.create(&service_draft()).await?;
    let b = services.create(&service_draft()).await?;
    assert!(a.is_fallback() && b.is_fallback());
    let (a, b) = (a.into_inner(), b.into_inner());
    assert_ne!(a.id, b.id);
    assert_eq!(a.name, "Window Washing");

    let booking = context
        .client
        .bookings()
        .create(&new_booking(&a))
        .await?
        .into_inner();
    assert_eq!(booking.service_id, a.id);

    Ok(())
}

#[tokio::test]
async fn offline_users_and_bookings() -> anyhow::Result<()> {
    let context = offline_context(true);
    let client = &context.client;

    let bookings = client.bookings().my_bookings().await?;
    assert!(bookings.is_fallback());
    assert!(!bookings.into_inner().is_empty());

    let profile = client.users().profile().await?.into_inner();
    assert_eq!(profile.name, "Demo User");
    let stats = client.users().provider_stats().await?.into_inner();
    assert_eq!(stats, ProviderStats::default());

    let updated = client
        .users()
        .update_profile(&ProfileUpdate {
            name: Some("Renamed".into()),
            photo_url: None,
        })
        .await?
        .into_inner();
    assert_eq!(updated.name, "Renamed");

    let receipt = client
        .bookings()
        .add_review(
            &BookingId::from("demo-booking-3"),
            &NewReview {
                rating: 4,
                comment: "Good".into(),
            },
        )
        .await?;
    assert!(receipt.is_fallback());
    assert_eq!(receipt.into_inner().booking, None);

    Ok(())
}

#[tokio::test]
async fn offline_without_demo_mode_fails() -> anyhow::Result<()> {
    let context = offline_context(false);

    let result = context
        .client
        .services()
        .list(&ServiceFilters::default())
        .await;
    assert!(matches!(result, Err(ClientError::Network(_))));
    // transport failures other than timeouts are only logged
    assert!(context.toasts.messages().is_empty());

    Ok(())
}

#[tokio::test]
async fn server_error_in_demo_mode_still_toasts() -> anyhow::Result<()> {
    let app = spawn_app_with(|config| config.demo_mode = true).await;
    app.backend.fail_next(500);

    let services = app
        .client()
        .services()
        .list(&ServiceFilters::default())
        .await?;
    assert!(services.is_fallback());
    assert_eq!(app.toasts(), vec![SERVER_ERROR.to_string()]);

    let live = app
        .client()
        .services()
        .list(&ServiceFilters::default())
        .await?;
    assert!(!live.is_fallback());

    Ok(())
}
