use crate::requests::ProfileUpdate;
use crate::responses::decode_entity;
use crate::{
    APIClient, ClientError, ProviderStats, Sourced, UserProfile, demo,
};

pub struct UsersAPI<'a> {
    pub(crate) client: &'a APIClient,
}

impl UsersAPI<'_> {
    pub async fn profile(&self) -> Result<Sourced<UserProfile>, ClientError> {
        let result = self.fetch::<UserProfile>("users/profile").await;
        self.client
            .or_fallback("fetching profile", result, demo::profile)
    }

    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<Sourced<UserProfile>, ClientError> {
        let result = self.send_update(update).await;
        self.client.or_fallback("updating profile", result, || {
            demo::updated_profile(update)
        })
    }

    pub async fn provider_stats(
        &self,
    ) -> Result<Sourced<ProviderStats>, ClientError> {
        let result = self.fetch::<ProviderStats>("users/provider-stats").await;
        self.client.or_fallback(
            "fetching provider stats",
            result,
            demo::provider_stats,
        )
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let body = self.client.get(path).await?;
        Ok(decode_entity(&body)?)
    }

    async fn send_update(
        &self,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ClientError> {
        let body = self.client.patch("users/profile", update).await?;
        Ok(decode_entity(&body)?)
    }
}
