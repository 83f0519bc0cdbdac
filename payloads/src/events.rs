//! Seams through which the client reports to whoever hosts it.

pub const SESSION_EXPIRED: &str = "Session expired. Please login again.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const REQUEST_TIMEOUT: &str =
    "Request timeout. Please check your connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Error,
    Success,
    Info,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

pub trait Navigator: Send + Sync {
    /// Leave the current view for the login view.
    fn redirect_to_login(&self);
}

/// Logs instead of surfacing anything. Used when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&self, notice: Notice) {
        tracing::debug!(kind = ?notice.kind, message = %notice.message);
    }
}

impl Navigator for Silent {
    fn redirect_to_login(&self) {
        tracing::debug!("redirect to login requested");
    }
}
