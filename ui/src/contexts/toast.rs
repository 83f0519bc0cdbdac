use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use payloads::{Notice, NoticeKind, Notifier};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Error,
    Success,
    Info,
}

impl From<NoticeKind> for ToastType {
    fn from(kind: NoticeKind) -> Self {
        match kind {
            NoticeKind::Error => ToastType::Error,
            NoticeKind::Success => ToastType::Success,
            NoticeKind::Info => ToastType::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub toast_type: ToastType,
    pub duration: Option<Duration>, // None for no auto-dismiss
    pub created_at: Instant,
}

impl Toast {
    pub fn new(message: String, toast_type: ToastType) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
            toast_type,
            duration: Some(Duration::from_secs(5)),
            created_at: Instant::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self::new(message, ToastType::Error)
    }

    pub fn success(message: String) -> Self {
        Self::new(message, ToastType::Success)
    }

    pub fn info(message: String) -> Self {
        Self::new(message, ToastType::Info)
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn no_auto_dismiss(mut self) -> Self {
        self.duration = None;
        self
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        match self.duration {
            Some(duration) => now.duration_since(self.created_at) >= duration,
            None => false,
        }
    }

    fn same_content(&self, other: &Toast) -> bool {
        self.toast_type == other.toast_type && self.message == other.message
    }
}

impl From<Notice> for Toast {
    fn from(notice: Notice) -> Self {
        Toast::new(notice.message, notice.kind.into())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToastState {
    /// Oldest first.
    pub toasts: Vec<Toast>,
}

pub enum ToastAction {
    Add(Toast),
    Remove(Uuid),
    Prune(Instant),
    Clear,
}

impl ToastState {
    pub fn reduce(&mut self, action: ToastAction) {
        match action {
            ToastAction::Add(toast) => {
                self.toasts.push(toast);
            }
            ToastAction::Remove(id) => {
                self.toasts.retain(|toast| toast.id != id);
            }
            ToastAction::Prune(now) => {
                self.toasts.retain(|toast| !toast.is_expired(now));
            }
            ToastAction::Clear => {
                self.toasts.clear();
            }
        }
    }
}

/// The single queue every notification in the client goes through.
///
/// A toast identical in type and message to one that is still showing is
/// dropped, so a burst of identical failures shows one toast.
#[derive(Debug, Default)]
pub struct ToastQueue {
    state: Mutex<ToastState>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ToastState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show `toast` unless an identical one is showing. Returns the id of
    /// the toast that was added.
    pub fn push(&self, toast: Toast) -> Option<Uuid> {
        let mut state = self.state();
        state.reduce(ToastAction::Prune(Instant::now()));
        if state.toasts.iter().any(|shown| shown.same_content(&toast)) {
            tracing::debug!(message = %toast.message, "duplicate toast");
            return None;
        }
        let id = toast.id;
        state.reduce(ToastAction::Add(toast));
        Some(id)
    }

    pub fn dismiss(&self, id: Uuid) {
        self.state().reduce(ToastAction::Remove(id));
    }

    pub fn clear(&self) {
        self.state().reduce(ToastAction::Clear);
    }

    /// Toasts currently showing, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        let mut state = self.state();
        state.reduce(ToastAction::Prune(Instant::now()));
        state.toasts.clone()
    }

    /// Messages currently showing, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.active().into_iter().map(|toast| toast.message).collect()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notice: Notice) {
        self.push(notice.into());
    }
}
