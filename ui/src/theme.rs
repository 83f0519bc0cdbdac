use std::sync::{Arc, Mutex, PoisonError};

use payloads::KeyValueStore;

const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn from_stored(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }
}

/// Whether the host environment prefers a dark color scheme.
pub trait SystemPreference: Send + Sync {
    fn prefers_dark(&self) -> bool;
}

impl<F> SystemPreference for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn prefers_dark(&self) -> bool {
        self()
    }
}

pub struct ThemeContext {
    storage: Arc<dyn KeyValueStore>,
    system: Box<dyn SystemPreference>,
    theme: Mutex<Theme>,
}

impl ThemeContext {
    /// Restore the stored preference, falling back to the system theme.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        system: impl SystemPreference + 'static,
    ) -> Self {
        let theme = storage
            .get(THEME_KEY)
            .map(|stored| Theme::from_stored(&stored))
            .unwrap_or_default();
        Self {
            storage,
            system: Box::new(system),
            theme: Mutex::new(theme),
        }
    }

    pub fn theme(&self) -> Theme {
        *self.theme.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The theme actually shown; never `System`.
    pub fn effective(&self) -> Theme {
        match self.theme() {
            Theme::System if self.system.prefers_dark() => Theme::Dark,
            Theme::System => Theme::Light,
            theme => theme,
        }
    }

    pub fn set_theme(&self, theme: Theme) {
        // store preference unless it's the system default
        if theme == Theme::System {
            self.storage.remove(THEME_KEY);
        } else {
            self.storage.set(THEME_KEY, theme.as_str());
        }
        *self.theme.lock().unwrap_or_else(PoisonError::into_inner) = theme;
        tracing::debug!(theme = theme.as_str(), "theme changed");
    }

    pub fn toggle(&self) -> Theme {
        let next = match self.effective() {
            Theme::Dark => Theme::Light,
            _ => Theme::Dark,
        };
        self.set_theme(next);
        next
    }
}
