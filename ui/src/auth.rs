use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use jiff::Timestamp;
use payloads::{Notice, Notifier, TokenStore, UserId};
use secrecy::SecretString;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub last_login_at: Option<Timestamp>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: AuthUser,
    pub token: SecretString,
}

/// A failure reported by the identity provider, identified by its code
/// (for example `auth/wrong-password`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identity provider error {code}")]
pub struct AuthError {
    pub code: String,
}

impl AuthError {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Text shown to the user for this error.
    pub fn message(&self) -> &'static str {
        match self.code.as_str() {
            "auth/invalid-email" => "Invalid email address",
            "auth/user-disabled" => "This account has been disabled",
            "auth/user-not-found" => "No account found with this email",
            "auth/wrong-password" => "Incorrect password",
            "auth/email-already-in-use" => {
                "An account with this email already exists"
            }
            "auth/weak-password" => "Password should be at least 6 characters",
            "auth/network-request-failed" => {
                "Network error. Please check your connection"
            }
            "auth/too-many-requests" => {
                "Too many attempts. Please try again later."
            }
            "auth/operation-not-allowed" => "This operation is not allowed.",
            "auth/requires-recent-login" => {
                "Please login again to perform this action."
            }
            _ => "An error occurred. Please try again.",
        }
    }
}

/// External identity service the session is built on.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<AuthUser>;

    /// Receives the current user every time it changes.
    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>>;

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError>;

    async fn sign_in_with_google(&self) -> Result<AuthUser, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Set display name and/or photo of the current user.
    async fn update_profile(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<AuthUser, AuthError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    async fn id_token(&self, user: &AuthUser)
    -> Result<SecretString, AuthError>;
}

#[derive(Debug)]
struct SessionState {
    user: Option<AuthUser>,
    loading: bool,
}

/// Tracks who is signed in and keeps the API token in step with it.
pub struct SessionContext {
    provider: Arc<dyn IdentityProvider>,
    tokens: TokenStore,
    notifier: Arc<dyn Notifier>,
    state: Mutex<SessionState>,
}

impl SessionContext {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        tokens: TokenStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            provider,
            tokens,
            notifier,
            state: Mutex::new(SessionState {
                user: None,
                loading: true,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.state().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// The signed-in user with the token requests are sent with. Gone as
    /// soon as the token store is cleared, including by a rejected request.
    pub fn session(&self) -> Option<Session> {
        let token = self.tokens.get()?;
        Some(Session {
            user: self.user()?,
            token,
        })
    }

    /// Apply an identity change: store the new user's token, or forget the
    /// token when signed out.
    pub async fn handle_change(&self, user: Option<AuthUser>) {
        let token = match &user {
            Some(user) => match self.provider.id_token(user).await {
                Ok(token) => Some(token),
                Err(e) => {
                    tracing::error!(code = %e.code, "failed to fetch id token");
                    None
                }
            },
            None => None,
        };
        match &token {
            Some(token) => self.tokens.set(token),
            None => self.tokens.clear(),
        }
        tracing::debug!(signed_in = user.is_some(), "session changed");
        let mut state = self.state();
        state.user = user;
        state.loading = false;
    }

    /// Load whoever the provider currently has signed in.
    pub async fn resolve(&self) {
        self.handle_change(self.provider.current_user()).await;
    }

    /// Follow identity changes until the provider goes away.
    pub fn watch(self: &Arc<Self>) -> JoinHandle<()> {
        let session = Arc::clone(self);
        let mut changes = self.provider.subscribe();
        tokio::spawn(async move {
            loop {
                let user = changes.borrow_and_update().clone();
                session.handle_change(user).await;
                if changes.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    fn fail(&self, e: &AuthError) {
        tracing::warn!(code = %e.code, "authentication failed");
        self.notifier.notify(Notice::error(e.message()));
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        match self.provider.sign_in(email, password).await {
            Ok(user) => {
                self.handle_change(Some(user.clone())).await;
                self.notifier
                    .notify(Notice::success("Welcome back to HomeHero!"));
                Ok(user)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Create an account and give it a display name and photo. Without a
    /// photo a generated avatar is used.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        photo_url: Option<&str>,
    ) -> Result<AuthUser, AuthError> {
        match self
            .sign_up_with_profile(name, email, password, photo_url)
            .await
        {
            Ok(user) => {
                self.handle_change(Some(user.clone())).await;
                self.notifier.notify(Notice::success(
                    "Account created successfully! Welcome to HomeHero!",
                ));
                Ok(user)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    async fn sign_up_with_profile(
        &self,
        name: &str,
        email: &str,
        password: &str,
        photo_url: Option<&str>,
    ) -> Result<AuthUser, AuthError> {
        self.provider.sign_up(email, password).await?;
        let photo_url = match photo_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => url.to_string(),
            None => default_avatar(name),
        };
        self.provider
            .update_profile(Some(name), Some(&photo_url))
            .await
    }

    pub async fn google_login(&self) -> Result<AuthUser, AuthError> {
        match self.provider.sign_in_with_google().await {
            Ok(user) => {
                self.handle_change(Some(user.clone())).await;
                self.notifier.notify(Notice::success("Welcome to HomeHero!"));
                Ok(user)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        match self.provider.sign_out().await {
            Ok(()) => {
                self.handle_change(None).await;
                self.notifier
                    .notify(Notice::success("Logged out successfully"));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(code = %e.code, "sign out failed");
                self.notifier.notify(Notice::error("Error logging out"));
                Err(e)
            }
        }
    }

    pub async fn update_profile(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<AuthUser, AuthError> {
        match self.provider.update_profile(display_name, photo_url).await {
            Ok(user) => {
                self.state().user = Some(user.clone());
                self.notifier
                    .notify(Notice::success("Profile updated successfully"));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(code = %e.code, "profile update failed");
                self.notifier.notify(Notice::error("Error updating profile"));
                Err(e)
            }
        }
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        match self.provider.send_password_reset(email).await {
            Ok(()) => {
                self.notifier
                    .notify(Notice::success("Password reset email sent!"));
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }
}

/// Generated avatar showing the user's initials.
pub fn default_avatar(name: &str) -> String {
    reqwest::Url::parse_with_params(
        "https://ui-avatars.com/api/",
        &[("name", name), ("background", "3B82F6"), ("color", "fff")],
    )
    .map(String::from)
    .unwrap_or_default()
}
