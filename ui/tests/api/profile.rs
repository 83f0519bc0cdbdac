use payloads::requests::ProfileUpdate;
use rust_decimal::dec;
use test_helpers::spawn_app;

#[tokio::test]
async fn provider_profile_and_stats() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_provider();

    let hook = app.context.profile().await;
    let snapshot = hook.snapshot();
    assert!(!snapshot.is_loading);
    assert!(!snapshot.is_demo);
    assert_eq!(snapshot.profile, Some(app.dataset.provider.clone()));

    let stats = snapshot.stats.unwrap();
    assert_eq!(stats.total_services, 1);
    assert_eq!(stats.total_bookings, 2);
    assert_eq!(stats.total_revenue, dec!(120));

    Ok(())
}

#[tokio::test]
async fn update_profile() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let hook = app.context.profile().await;

    let update = ProfileUpdate {
        name: Some("Casey Renamed".into()),
        photo_url: Some("https://example.com/casey.png".into()),
    };
    let profile = hook.update_profile(&update).await?;
    assert_eq!(profile.name, "Casey Renamed");
    assert_eq!(hook.snapshot().profile, Some(profile));
    assert_eq!(app.toasts(), vec!["Profile updated successfully".to_string()]);

    // the backend kept it
    let fetched = app.client().users().profile().await?.into_inner();
    assert_eq!(fetched.name, "Casey Renamed");

    Ok(())
}

#[tokio::test]
async fn profile_requires_sign_in() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let hook = app.context.profile().await;
    let snapshot = hook.snapshot();
    assert_eq!(snapshot.profile, None);
    assert!(snapshot.error.is_some());
    assert!(!snapshot.is_loading);

    Ok(())
}
