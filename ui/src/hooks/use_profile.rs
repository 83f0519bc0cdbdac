use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use payloads::requests::ProfileUpdate;
use payloads::{APIClient, Notice, Notifier, ProviderStats, UserProfile};

use super::HookError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSnapshot {
    pub profile: Option<UserProfile>,
    pub stats: Option<ProviderStats>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_demo: bool,
}

#[derive(Debug, Default)]
struct ProfileState {
    snapshot: ProfileSnapshot,
    generation: u64,
}

/// The signed-in user's profile and provider dashboard numbers.
pub struct ProfileHook {
    client: Arc<APIClient>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ProfileState>,
}

/// Create the hook and run its first fetch.
pub async fn use_profile(
    client: Arc<APIClient>,
    notifier: Arc<dyn Notifier>,
) -> ProfileHook {
    let hook = ProfileHook {
        client,
        notifier,
        state: Mutex::new(ProfileState::default()),
    };
    // failures are kept in the hook state
    let _ = hook.refetch().await;
    hook
}

impl ProfileHook {
    fn state(&self) -> MutexGuard<'_, ProfileState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        self.state().snapshot.clone()
    }

    pub async fn refetch(&self) -> Result<(), HookError> {
        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.snapshot.is_loading = true;
            state.generation
        };

        let users = self.client.users();
        let result = match users.profile().await {
            Ok(profile) => users
                .provider_stats()
                .await
                .map(|stats| (profile, stats)),
            Err(e) => Err(e),
        };

        let mut state = self.state();
        if state.generation != generation {
            tracing::debug!(generation, "discarding stale profile fetch");
            return Ok(());
        }
        state.snapshot.is_loading = false;
        match result {
            Ok((profile, stats)) => {
                state.snapshot.is_demo =
                    profile.is_fallback() || stats.is_fallback();
                state.snapshot.profile = Some(profile.into_inner());
                state.snapshot.stats = Some(stats.into_inner());
                state.snapshot.error = None;
                Ok(())
            }
            Err(e) => {
                state.snapshot.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, HookError> {
        match self.client.users().update_profile(update).await {
            Ok(profile) => {
                let profile = profile.into_inner();
                self.state().snapshot.profile = Some(profile.clone());
                self.notifier
                    .notify(Notice::success("Profile updated successfully"));
                Ok(profile)
            }
            Err(e) => {
                self.notifier.notify(Notice::error("Error updating profile"));
                Err(e.into())
            }
        }
    }
}
