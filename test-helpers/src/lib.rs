pub mod backend;
pub mod mock;

use std::net::TcpListener;

use backend::MockBackend;
use jiff::{Timestamp, ToSpan};
use mock::Dataset;
use payloads::requests::{NewBooking, ServiceDraft};
use payloads::{APIClient, Service};
use reqwest::StatusCode;
use rust_decimal::dec;
use secrecy::SecretString;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;
use ui::AppContext;
use ui::config::ClientConfig;
use ui::telemetry;

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub backend: MockBackend,
    pub dataset: Dataset,
    pub context: AppContext,
}

impl TestApp {
    pub fn client(&self) -> &APIClient {
        &self.context.client
    }

    /// Act as the seeded customer.
    pub fn sign_in_customer(&self) {
        self.sign_in_with(mock::CUSTOMER_TOKEN);
    }

    /// Act as the provider owning the first listing.
    pub fn sign_in_provider(&self) {
        self.sign_in_with(mock::PROVIDER_TOKEN);
    }

    pub fn sign_in_with(&self, token: &str) {
        self.context
            .tokens()
            .set(&SecretString::from(token.to_string()));
    }

    /// Messages of the toasts currently showing, oldest first.
    pub fn toasts(&self) -> Vec<String> {
        self.context.toasts.messages()
    }
}

fn init_logging() {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();
}

/// Start a seeded mock backend and a client configured by `configure`.
///
/// The backend address is filled in after `configure` runs.
pub async fn spawn_app_with(
    configure: impl FnOnce(&mut ClientConfig),
) -> TestApp {
    init_logging();

    let backend = MockBackend::new();
    let dataset = Dataset::seed(&backend);
    let (server, port) =
        backend::build(backend.clone(), "127.0.0.1", 0).unwrap();
    tokio::spawn(server);

    let mut config = ClientConfig::default();
    configure(&mut config);
    config.backend_url = format!("http://127.0.0.1:{port}");
    let context = AppContext::new(&config).unwrap();

    TestApp {
        port,
        backend,
        dataset,
        context,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| ()).await
}

/// A client whose backend refuses every connection.
pub fn offline_context(demo_mode: bool) -> AppContext {
    init_logging();

    // nothing listens on a port we just released
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .unwrap();
    let config = ClientConfig {
        backend_url: format!("http://127.0.0.1:{port}"),
        demo_mode,
        ..ClientConfig::default()
    };
    AppContext::new(&config).unwrap()
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(payloads::ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}

pub fn service_draft() -> ServiceDraft {
    ServiceDraft {
        name: "Window Washing".into(),
        category: "Cleaner".into(),
        price: dec!(75),
        description: "Streak-free windows inside and out.".into(),
        image_url: "https://example.com/windows.jpg".into(),
        provider_name: "Clear View".into(),
        provider_email: "clearview@homehero.com".into(),
    }
}

/// A booking of `service` three days from now.
pub fn new_booking(service: &Service) -> NewBooking {
    NewBooking::for_service(
        service,
        Timestamp::now() + 72.hours(),
        Some("Please ring twice".into()),
    )
}
