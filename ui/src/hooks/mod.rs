pub mod use_bookings;
pub mod use_profile;
pub mod use_services;

pub use use_bookings::{BookingsHook, use_bookings};
pub use use_profile::{ProfileHook, ProfileSnapshot, use_profile};
pub use use_services::{ServiceSummary, ServicesHook, use_services};

use payloads::{Booking, BookingId, ClientError, Service, ServiceId, Sourced};

use crate::validators::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    /// The action is not available for the entity in its current state.
    #[error("{0}")]
    NotAllowed(String),
}

/// Entities cached by a hook, identified by their id.
pub trait Keyed {
    type Id: PartialEq;

    fn key(&self) -> &Self::Id;
}

impl Keyed for Service {
    type Id = ServiceId;

    fn key(&self) -> &ServiceId {
        &self.id
    }
}

impl Keyed for Booking {
    type Id = BookingId;

    fn key(&self) -> &BookingId {
        &self.id
    }
}

/// What a collection hook currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSnapshot<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// The items are demo data standing in for a failed fetch.
    pub is_demo: bool,
    pub is_fetched: bool,
}

impl<T> CollectionSnapshot<T> {
    /// Returns true if this is the initial load (no data, no error, loading)
    pub fn is_initial_loading(&self) -> bool {
        self.is_loading && !self.is_fetched && self.error.is_none()
    }
}

/// State owned by one collection hook.
///
/// Every fetch takes a generation number from [`Collection::begin_fetch`];
/// only the completion carrying the latest generation is applied, so the
/// last fetch issued wins no matter in which order responses arrive.
#[derive(Debug)]
pub(crate) struct Collection<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    demo: bool,
    fetched: bool,
    generation: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            demo: false,
            fetched: false,
            generation: 0,
        }
    }
}

impl<T: Keyed + Clone> Collection<T> {
    pub(crate) fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Apply the outcome of fetch `generation`. Returns false, changing
    /// nothing, when a newer fetch has been issued since.
    pub(crate) fn finish_fetch(
        &mut self,
        generation: u64,
        outcome: Result<Sourced<Vec<T>>, String>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale fetch"
            );
            return false;
        }
        match outcome {
            Ok(items) => {
                self.demo = items.is_fallback();
                self.items = items.into_inner();
                self.error = None;
                self.fetched = true;
            }
            // previous items stay visible
            Err(message) => self.error = Some(message),
        }
        self.loading = false;
        true
    }

    /// Put `item` first, dropping any cached entry with the same id.
    pub(crate) fn prepend(&mut self, item: T) {
        self.items.retain(|existing| existing.key() != item.key());
        self.items.insert(0, item);
    }

    /// Swap the entry with `id` for `item`, keeping its position.
    pub(crate) fn replace(&mut self, id: &T::Id, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.key() == id) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: &T::Id) -> bool {
        let before = self.items.len();
        self.items.retain(|existing| existing.key() != id);
        self.items.len() != before
    }

    pub(crate) fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|existing| existing.key() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        self.items.iter_mut().find(|existing| existing.key() == id)
    }

    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn snapshot(&self) -> CollectionSnapshot<T> {
        CollectionSnapshot {
            items: self.items.clone(),
            is_loading: self.loading,
            error: self.error.clone(),
            is_demo: self.demo,
            is_fetched: self.fetched,
        }
    }
}
