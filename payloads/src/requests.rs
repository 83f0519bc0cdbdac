use crate::{Service, ServiceId};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Filters for listing services, sent as query parameters.
///
/// The same matching rules are applied locally to demo data, see
/// [`ServiceFilters::matches`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_price: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ServiceFilters {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Category compares ignoring ASCII case, price bounds are inclusive and
    /// the search term matches a case-insensitive substring of the name,
    /// description or category.
    pub fn matches(&self, service: &Service) -> bool {
        if let Some(category) = &self.category {
            if !service.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if service.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if service.price > max {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let term = search.to_lowercase();
            let found = [&service.name, &service.description, &service.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
            if !found {
                return false;
            }
        }
        true
    }
}

/// Editable fields of a service, used to create and to update listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDraft {
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
    pub provider_name: String,
    pub provider_email: String,
}

impl From<&Service> for ServiceDraft {
    fn from(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            category: service.category.clone(),
            price: service.price,
            description: service.description.clone(),
            image_url: service.image_url.clone(),
            provider_name: service.provider_name.clone(),
            provider_email: service.provider_email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub service_id: ServiceId,
    pub service_name: String,
    pub provider_email: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub booking_date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

impl NewBooking {
    /// Snapshot the fields of `service` that a booking keeps.
    pub fn for_service(
        service: &Service,
        booking_date: Timestamp,
        special_requests: Option<String>,
    ) -> Self {
        Self {
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            provider_email: service.provider_email.clone(),
            price: service.price,
            booking_date,
            special_requests: special_requests.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}
