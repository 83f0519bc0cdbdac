//! Client-side state for the HomeHero marketplace: the session, the data
//! hooks backing each view, notifications, theme and navigation, all built
//! on the `payloads` API client.

pub mod auth;
pub mod config;
pub mod contexts;
pub mod hooks;
pub mod route;
pub mod telemetry;
pub mod theme;
pub mod validators;

use std::sync::Arc;

use anyhow::Context;
use payloads::requests::ServiceFilters;
use payloads::{APIClient, FileStore, KeyValueStore, MemoryStore, TokenStore};

use crate::auth::{IdentityProvider, SessionContext};
use crate::config::ClientConfig;
use crate::contexts::toast::ToastQueue;
use crate::hooks::{
    BookingsHook, ProfileHook, ServicesHook, use_bookings, use_profile,
    use_services,
};
use crate::route::History;
use crate::theme::{SystemPreference, ThemeContext};

/// Everything the views share: one client, one notification queue, one
/// navigation history and one persisted store.
#[derive(Clone)]
pub struct AppContext {
    pub client: Arc<APIClient>,
    pub toasts: Arc<ToastQueue>,
    pub history: Arc<History>,
    pub storage: Arc<dyn KeyValueStore>,
}

impl AppContext {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let storage: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Arc::new(
                FileStore::open(path)
                    .with_context(|| format!("opening {}", path.display()))?,
            ),
            None => Arc::new(MemoryStore::new()),
        };
        let toasts = Arc::new(ToastQueue::new());
        let history = Arc::new(History::default());

        let client = APIClient::new(
            &config.backend_url,
            config.request_timeout,
            TokenStore::new(storage.clone()),
        )?
        .with_notifier(toasts.clone())
        .with_navigator(history.clone())
        .with_demo_mode(config.demo_mode);

        tracing::info!(
            backend = %config.backend_url,
            demo_mode = config.demo_mode,
            "client ready"
        );
        Ok(Self {
            client: Arc::new(client),
            toasts,
            history,
            storage,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.client.tokens
    }

    pub fn session(
        &self,
        provider: Arc<dyn IdentityProvider>,
    ) -> Arc<SessionContext> {
        Arc::new(SessionContext::new(
            provider,
            self.tokens().clone(),
            self.toasts.clone(),
        ))
    }

    pub fn theme(
        &self,
        system: impl SystemPreference + 'static,
    ) -> ThemeContext {
        ThemeContext::new(self.storage.clone(), system)
    }

    pub async fn services(&self, filters: ServiceFilters) -> ServicesHook {
        use_services(self.client.clone(), self.toasts.clone(), filters).await
    }

    /// `customer_email` is the signed-in user's email, if known.
    pub async fn bookings(
        &self,
        customer_email: Option<String>,
    ) -> BookingsHook {
        use_bookings(self.client.clone(), self.toasts.clone(), customer_email)
            .await
    }

    pub async fn profile(&self) -> ProfileHook {
        use_profile(self.client.clone(), self.toasts.clone()).await
    }
}
