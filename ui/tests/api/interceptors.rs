use std::time::Duration;

use payloads::events::{REQUEST_TIMEOUT, SERVER_ERROR, SESSION_EXPIRED};
use payloads::requests::ServiceFilters;
use payloads::{ClientError, ServiceId};
use reqwest::StatusCode;
use test_helpers::{assert_status_code, spawn_app, spawn_app_with};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use ui::AppContext;
use ui::config::ClientConfig;
use ui::route::Route;

#[tokio::test]
async fn bearer_token_is_read_per_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let services = app.client().services();

    services.list(&ServiceFilters::default()).await?;
    assert_eq!(app.backend.last_request().unwrap().authorization, None);

    app.sign_in_customer();
    services.list(&ServiceFilters::default()).await?;
    assert_eq!(
        app.backend.last_request().unwrap().authorization.as_deref(),
        Some("Bearer customer-token")
    );

    app.context.tokens().clear();
    services.list(&ServiceFilters::default()).await?;
    assert_eq!(app.backend.last_request().unwrap().authorization, None);

    Ok(())
}

#[tokio::test]
async fn unauthorized_ends_the_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_with("expired-token");

    let result = app.client().bookings().my_bookings().await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    assert!(!app.context.tokens().is_present());
    assert_eq!(app.context.history.current(), Route::Login);
    assert_eq!(app.toasts(), vec![SESSION_EXPIRED.to_string()]);

    // the cleared token is not sent again
    app.client()
        .services()
        .list(&ServiceFilters::default())
        .await?;
    assert_eq!(app.backend.last_request().unwrap().authorization, None);

    Ok(())
}

#[tokio::test]
async fn revoked_token_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    app.backend.revoke_tokens();

    let result = app.client().users().profile().await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);
    assert!(!app.context.tokens().is_present());

    Ok(())
}

#[tokio::test]
async fn server_errors_toast_once() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.sign_in_customer();
    app.backend.fail_next(500);
    app.backend.fail_next(503);

    let services = app.client().services();
    assert_status_code(
        services.list(&ServiceFilters::default()).await,
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    assert_status_code(
        services.list(&ServiceFilters::default()).await,
        StatusCode::SERVICE_UNAVAILABLE,
    );

    // identical toasts collapse
    assert_eq!(app.toasts(), vec![SERVER_ERROR.to_string()]);
    // the session survives
    assert!(app.context.tokens().is_present());

    // and the next request goes through
    let services = services.list(&ServiceFilters::default()).await?;
    assert_eq!(services.into_inner().len(), 10);

    Ok(())
}

#[tokio::test]
async fn not_found_is_quiet() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = app
        .client()
        .services()
        .get(&ServiceId::from("no-such-service"))
        .await;
    assert_status_code(result, StatusCode::NOT_FOUND);
    assert!(app.toasts().is_empty());
    assert_eq!(app.context.history.current(), Route::Home);

    Ok(())
}

#[tokio::test]
async fn slow_responses_time_out() -> anyhow::Result<()> {
    let app = spawn_app_with(|config| {
        config.request_timeout = Duration::from_millis(200);
    })
    .await;
    app.backend.set_latency(Duration::from_secs(1));

    let result = app
        .client()
        .services()
        .list(&ServiceFilters::default())
        .await;
    assert!(matches!(result, Err(ClientError::Timeout)));
    assert_eq!(app.toasts(), vec![REQUEST_TIMEOUT.to_string()]);

    Ok(())
}

#[tokio::test]
async fn stalled_body_times_out() -> anyhow::Result<()> {
    // headers arrive at once, the body never finishes
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0; 4096];
                let _ = socket.read(&mut request).await;
                let head = "HTTP/1.1 200 OK\r\n\
                    content-type: application/json\r\n\
                    content-length: 100\r\n\r\n[";
                let _ = socket.write_all(head.as_bytes()).await;
                tokio::time::sleep(Duration::from_secs(5)).await;
            });
        }
    });

    let context = AppContext::new(&ClientConfig {
        backend_url: format!("http://{address}"),
        request_timeout: Duration::from_millis(300),
        ..ClientConfig::default()
    })?;
    let result = context
        .client
        .services()
        .list(&ServiceFilters::default())
        .await;
    assert!(matches!(result, Err(ClientError::Timeout)));
    assert_eq!(context.toasts.messages(), vec![REQUEST_TIMEOUT.to_string()]);

    Ok(())
}
