use payloads::ServiceId;
use payloads::requests::{ServiceDraft, ServiceFilters};
use reqwest::StatusCode;
use rust_decimal::dec;
use test_helpers::backend::Envelope;
use test_helpers::{assert_status_code, service_draft, spawn_app};

#[tokio::test]
async fn list_all_services() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let services = app
        .client()
        .services()
        .list(&ServiceFilters::default())
        .await?;
    assert!(!services.is_fallback());
    assert_eq!(services.into_inner().len(), 10);

    // no token, no header
    let request = app.backend.last_request().unwrap();
    assert_eq!(request.path, "/cleaner");
    assert_eq!(request.authorization, None);

    Ok(())
}

#[tokio::test]
async fn filter_services() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let services = app.client().services();

    let plumbers = services
        .list(&ServiceFilters::by_category("Plumber"))
        .await?
        .into_inner();
    assert_eq!(plumbers.len(), 1);
    assert_eq!(plumbers[0].category, "Plumber");

    let mid_range = ServiceFilters {
        min_price: Some(dec!(100)),
        max_price: Some(dec!(150)),
        ..ServiceFilters::default()
    };
    let priced = services.list(&mid_range).await?.into_inner();
    assert_eq!(priced.len(), 5);
    assert!(
        priced
            .iter()
            .all(|s| s.price >= dec!(100) && s.price <= dec!(150))
    );

    Ok(())
}

#[tokio::test]
async fn list_accepts_every_envelope() -> anyhow::Result<()> {
    let app = spawn_app().await;

    for envelope in [Envelope::Bare, Envelope::Data, Envelope::Services] {
        app.backend.set_envelope(envelope);
        let services = app
            .client()
            .services()
            .list(&ServiceFilters::default())
            .await?;
        assert_eq!(services.into_inner().len(), 10, "{envelope:?}");
    }

    Ok(())
}

#[tokio::test]
async fn get_service_by_id() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let expected = app.dataset.services[1].clone();

    let service = app.client().services().get(&expected.id).await?;
    assert_eq!(service.into_inner(), expected);

    app.backend.set_envelope(Envelope::Data);
    let service = app.client().services().get(&expected.id).await?;
    assert_eq!(service.into_inner().id, expected.id);

    let missing = app
        .client()
        .services()
        .get(&ServiceId::from("no-such-service"))
        .await;
    assert_status_code(missing, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn create_requires_sign_in() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = app.client().services().create(&service_draft()).await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);
    assert_eq!(app.backend.services().len(), 10);

    Ok(())
}

#[tokio::test]
async fn create_update_delete_service() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    let services = app.client().services();

    let created = services.create(&service_draft()).await?.into_inner();
    assert_eq!(created.name, "Window Washing");
    assert_eq!(created.price, dec!(75));
    assert!(app.backend.service(&created.id).is_some());

    let update = ServiceDraft {
        price: dec!(95),
        ..service_draft()
    };
    let updated = services.update(&created.id, &update).await?.into_inner();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.price, dec!(95));

    let ack = services.delete(&created.id).await?.into_inner();
    assert!(ack.success);
    assert_status_code(
        services.get(&created.id).await,
        StatusCode::NOT_FOUND,
    );

    Ok(())
}
