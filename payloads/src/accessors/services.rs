use crate::requests::{ServiceDraft, ServiceFilters};
use crate::responses::{Ack, decode_entity, decode_list};
use crate::{APIClient, ClientError, Service, ServiceId, Sourced, demo};

/// Service listings, served by the backend under `/cleaner`.
pub struct ServicesAPI<'a> {
    pub(crate) client: &'a APIClient,
}

impl ServicesAPI<'_> {
    pub async fn list(
        &self,
        filters: &ServiceFilters,
    ) -> Result<Sourced<Vec<Service>>, ClientError> {
        let result = self.fetch_list(filters).await;
        self.client.or_fallback("fetching services", result, || {
            demo::services_matching(filters)
        })
    }

    pub async fn get(
        &self,
        id: &ServiceId,
    ) -> Result<Sourced<Service>, ClientError> {
        let result = self.fetch_one(id).await;
        self.client
            .or_fallback("fetching service", result, || demo::service(id))
    }

    pub async fn create(
        &self,
        draft: &ServiceDraft,
    ) -> Result<Sourced<Service>, ClientError> {
        let result = self.send_create(draft).await;
        self.client.or_fallback("creating service", result, || {
            demo::created_service(draft)
        })
    }

    pub async fn update(
        &self,
        id: &ServiceId,
        draft: &ServiceDraft,
    ) -> Result<Sourced<Service>, ClientError> {
        let result = self.send_update(id, draft).await;
        self.client.or_fallback("updating service", result, || {
            demo::updated_service(id, draft)
        })
    }

    pub async fn delete(
        &self,
        id: &ServiceId,
    ) -> Result<Sourced<Ack>, ClientError> {
        let result = self
            .client
            .delete(&format!("cleaner/{id}"))
            .await
            .map(|_| Ack::OK);
        self.client.or_fallback("deleting service", result, || Ack::OK)
    }

    async fn fetch_list(
        &self,
        filters: &ServiceFilters,
    ) -> Result<Vec<Service>, ClientError> {
        let body = self.client.get_with_query("cleaner", filters).await?;
        Ok(decode_list(&body)?)
    }

    async fn fetch_one(&self, id: &ServiceId) -> Result<Service, ClientError> {
        let body = self.client.get(&format!("cleaner/{id}")).await?;
        Ok(decode_entity(&body)?)
    }

    async fn send_create(
        &self,
        draft: &ServiceDraft,
    ) -> Result<Service, ClientError> {
        let body = self.client.post("cleaner", draft).await?;
        Ok(decode_entity(&body)?)
    }

    async fn send_update(
        &self,
        id: &ServiceId,
        draft: &ServiceDraft,
    ) -> Result<Service, ClientError> {
        let body =
            self.client.patch(&format!("cleaner/{id}"), draft).await?;
        Ok(decode_entity(&body)?)
    }
}
