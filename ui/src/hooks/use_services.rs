use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use payloads::requests::{ServiceDraft, ServiceFilters};
use payloads::{
    APIClient, Notice, Notifier, SERVICE_CATEGORIES, Service, ServiceId,
};

use super::{Collection, CollectionSnapshot, HookError};
use crate::validators::{ValidationErrors, validate_service};

/// Headline numbers for a provider's listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSummary {
    pub total_services: usize,
    /// Mean of the per-service average rating, over services that have
    /// reviews.
    pub average_rating: Option<f64>,
}

/// Service listings matching the current filters, with create, update and
/// delete applied locally as they succeed.
pub struct ServicesHook {
    client: Arc<APIClient>,
    notifier: Arc<dyn Notifier>,
    filters: Mutex<ServiceFilters>,
    state: Mutex<Collection<Service>>,
}

/// Create the hook and run its first fetch.
pub async fn use_services(
    client: Arc<APIClient>,
    notifier: Arc<dyn Notifier>,
    filters: ServiceFilters,
) -> ServicesHook {
    let hook = ServicesHook {
        client,
        notifier,
        filters: Mutex::new(filters),
        state: Mutex::new(Collection::default()),
    };
    // failures are kept in the hook state
    let _ = hook.refetch().await;
    hook
}

impl ServicesHook {
    fn state(&self) -> MutexGuard<'_, Collection<Service>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn filters(&self) -> ServiceFilters {
        self.filters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn snapshot(&self) -> CollectionSnapshot<Service> {
        self.state().snapshot()
    }

    pub fn services(&self) -> Vec<Service> {
        self.state().items().to_vec()
    }

    pub fn get(&self, id: &ServiceId) -> Option<Service> {
        self.state().get(id).cloned()
    }

    /// Switch to `filters`, refetching only if they changed.
    pub async fn set_filters(
        &self,
        filters: ServiceFilters,
    ) -> Result<(), HookError> {
        {
            let mut current =
                self.filters.lock().unwrap_or_else(PoisonError::into_inner);
            if *current == filters {
                return Ok(());
            }
            *current = filters;
        }
        self.refetch().await
    }

    /// Fetch the services for the current filters, replacing the cached
    /// list.
    pub async fn refetch(&self) -> Result<(), HookError> {
        let filters = self.filters();
        let generation = self.state().begin_fetch();
        tracing::debug!(generation, ?filters, "fetching services");

        match self.client.services().list(&filters).await {
            Ok(services) => {
                self.state().finish_fetch(generation, Ok(services));
                Ok(())
            }
            Err(e) => {
                let current =
                    self.state().finish_fetch(generation, Err(e.to_string()));
                if current {
                    self.notifier
                        .notify(Notice::error("Failed to fetch services"));
                }
                Err(e.into())
            }
        }
    }

    fn reject(&self, errors: ValidationErrors) -> HookError {
        for message in errors.messages() {
            self.notifier.notify(Notice::error(message));
        }
        errors.into()
    }

    pub async fn create_service(
        &self,
        draft: &ServiceDraft,
    ) -> Result<Service, HookError> {
        validate_service(draft).map_err(|errors| self.reject(errors))?;
        match self.client.services().create(draft).await {
            Ok(created) => {
                let service = created.into_inner();
                self.state().prepend(service.clone());
                self.notifier
                    .notify(Notice::success("Service created successfully"));
                Ok(service)
            }
            Err(e) => {
                self.notifier
                    .notify(Notice::error("Failed to create service"));
                Err(e.into())
            }
        }
    }

    pub async fn update_service(
        &self,
        id: &ServiceId,
        draft: &ServiceDraft,
    ) -> Result<Service, HookError> {
        validate_service(draft).map_err(|errors| self.reject(errors))?;
        match self.client.services().update(id, draft).await {
            Ok(updated) => {
                let service = updated.into_inner();
                if !self.state().replace(id, service.clone()) {
                    tracing::debug!(%id, "updated service is not cached");
                }
                self.notifier
                    .notify(Notice::success("Service updated successfully"));
                Ok(service)
            }
            Err(e) => {
                self.notifier
                    .notify(Notice::error("Failed to update service"));
                Err(e.into())
            }
        }
    }

    pub async fn delete_service(
        &self,
        id: &ServiceId,
    ) -> Result<(), HookError> {
        match self.client.services().delete(id).await {
            Ok(_) => {
                self.state().remove(id);
                self.notifier
                    .notify(Notice::success("Service deleted successfully"));
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify(Notice::error("Failed to delete service"));
                Err(e.into())
            }
        }
    }

    pub fn summary(&self) -> ServiceSummary {
        summarize(self.state().items())
    }

    /// Categories to offer as filters: the standard list, then any other
    /// category the loaded services use.
    pub fn categories(&self) -> Vec<String> {
        categories_of(self.state().items())
    }
}

fn categories_of(services: &[Service]) -> Vec<String> {
    let mut categories: Vec<String> =
        SERVICE_CATEGORIES.iter().map(|c| c.to_string()).collect();
    for service in services {
        let known = categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&service.category));
        if !known && !service.category.trim().is_empty() {
            categories.push(service.category.clone());
        }
    }
    categories
}

fn summarize(services: &[Service]) -> ServiceSummary {
    let averages: Vec<f64> = services
        .iter()
        .filter_map(Service::average_review_rating)
        .collect();
    let average_rating = if averages.is_empty() {
        None
    } else {
        Some(averages.iter().sum::<f64>() / averages.len() as f64)
    };
    ServiceSummary {
        total_services: services.len(),
        average_rating,
    }
}
