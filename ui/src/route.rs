use std::sync::{Mutex, PoisonError};

use payloads::{Navigator, ServiceId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Services,
    ServiceDetails(ServiceId),
    MyServices,
    AddService,
    EditService(ServiceId),
    MyBookings,
    Profile,
    NotFound,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::Services => "/services".into(),
            Route::ServiceDetails(id) => format!("/services/{id}"),
            Route::MyServices => "/my-services".into(),
            Route::AddService => "/add-service".into(),
            Route::EditService(id) => format!("/edit-service/{id}"),
            Route::MyBookings => "/my-bookings".into(),
            Route::Profile => "/profile".into(),
            Route::NotFound => "/404".into(),
        }
    }

    pub fn recognize(path: &str) -> Route {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["services"] => Route::Services,
            ["services", id] => Route::ServiceDetails(ServiceId::from(*id)),
            ["my-services"] => Route::MyServices,
            ["add-service"] => Route::AddService,
            ["edit-service", id] => Route::EditService(ServiceId::from(*id)),
            ["my-bookings"] => Route::MyBookings,
            ["profile"] => Route::Profile,
            _ => Route::NotFound,
        }
    }

    /// Views that need a signed-in user.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::MyServices
                | Route::AddService
                | Route::EditService(_)
                | Route::MyBookings
                | Route::Profile
        )
    }
}

/// Navigation history. The last entry is the current view.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            entries: Mutex::new(vec![start]),
        }
    }

    pub fn push(&self, route: Route) {
        tracing::debug!(path = %route.path(), "navigate");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }

    pub fn back(&self) -> Option<Route> {
        let mut entries =
            self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() > 1 {
            entries.pop();
        }
        entries.last().cloned()
    }

    pub fn current(&self) -> Route {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or(Route::Home)
    }
}

impl Navigator for History {
    fn redirect_to_login(&self) {
        self.push(Route::Login);
    }
}
