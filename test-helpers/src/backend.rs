//! In-memory stand-in for the HomeHero REST backend.
//!
//! Serves the same routes as the real server from a shared state that tests
//! can seed, inspect and sabotage (forced failures, artificial latency,
//! revoked tokens, alternative response envelopes).

use std::collections::{HashMap, VecDeque};
use std::net::TcpListener;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use actix_web::dev::{HttpServiceFactory, Server};
use actix_web::http::StatusCode;
use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer, ResponseError, body::BoxBody,
    delete, get, patch, post, web,
};
use jiff::Timestamp;
use payloads::requests::{
    NewBooking, NewReview, ProfileUpdate, ServiceDraft, ServiceFilters,
};
use payloads::{
    Booking, BookingId, BookingStatus, ProviderStats, Review, Service,
    ServiceId, UserProfile,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Notify;
use uuid::Uuid;

/// How list and entity responses are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Envelope {
    #[default]
    Bare,
    /// `{"data": ...}`
    Data,
    /// `{"services": [...]}` for lists, bare entities otherwise.
    Services,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub profile: UserProfile,
}

#[derive(Debug, Clone)]
struct StoredBooking {
    customer_email: String,
    booking: Booking,
}

#[derive(Debug, Default)]
struct BackendState {
    services: Vec<Service>,
    bookings: Vec<StoredBooking>,
    /// bearer token → account
    accounts: HashMap<String, Account>,
    requests: Vec<RecordedRequest>,
    fail_next: VecDeque<StatusCode>,
    hold_next: VecDeque<Arc<Notify>>,
    latency: Duration,
    envelope: Envelope,
    /// Answer reviews with `{"success": false}` and store nothing.
    refuse_reviews: bool,
}

/// Handle on the mock backend's state. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<BackendState>>,
}

/// Seeding and inspection
impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accept `token` as a bearer token for `profile`.
    pub fn add_account(&self, token: &str, profile: UserProfile) {
        self.state()
            .accounts
            .insert(token.to_string(), Account { profile });
    }

    /// Reject every token issued so far.
    pub fn revoke_tokens(&self) {
        self.state().accounts.clear();
    }

    pub fn insert_service(&self, service: Service) {
        self.state().services.push(service);
    }

    pub fn insert_booking(&self, customer_email: &str, booking: Booking) {
        self.state().bookings.push(StoredBooking {
            customer_email: customer_email.to_string(),
            booking,
        });
    }

    pub fn services(&self) -> Vec<Service> {
        self.state().services.clone()
    }

    pub fn service(&self, id: &ServiceId) -> Option<Service> {
        self.state().services.iter().find(|s| &s.id == id).cloned()
    }

    pub fn booking(&self, id: &BookingId) -> Option<Booking> {
        self.state()
            .bookings
            .iter()
            .find(|stored| &stored.booking.id == id)
            .map(|stored| stored.booking.clone())
    }

    /// Move a booking along, as the provider would. Returns false, leaving
    /// the booking alone, when it is unknown or the move goes backwards.
    pub fn set_booking_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> bool {
        let mut state = self.state();
        let Some(stored) = state
            .bookings
            .iter_mut()
            .find(|stored| &stored.booking.id == id)
        else {
            return false;
        };
        if !stored.booking.status.can_transition_to(status) {
            return false;
        }
        stored.booking.status = status;
        true
    }

    pub fn set_envelope(&self, envelope: Envelope) {
        self.state().envelope = envelope;
    }

    pub fn refuse_reviews(&self, refuse: bool) {
        self.state().refuse_reviews = refuse;
    }

    /// Answer the next request with `status` instead of handling it.
    pub fn fail_next(&self, status: u16) {
        let status = StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.state().fail_next.push_back(status);
    }

    /// Park the next request, after recording it, until the returned
    /// handle is notified.
    pub fn hold_next(&self) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        self.state().hold_next.push_back(release.clone());
        release
    }

    /// Hold every request for `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = latency;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state().requests.last().cloned()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("Authentication failed")]
    Unauthorized,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Injected failure")]
    Injected(StatusCode),
}

impl ResponseError for MockError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Injected(status) => *status,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code())
            .json(json!({ "message": self.to_string() }))
    }
}

/// Record the request, apply injected failures and latency, and resolve the
/// caller's account. Requests without a token get `None`; requests with an
/// unknown token are rejected.
async fn enter(
    req: &HttpRequest,
    backend: &MockBackend,
) -> Result<Option<Account>, MockError> {
    let authorization = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let (failure, hold, latency) = {
        let mut state = backend.state();
        state.requests.push(RecordedRequest {
            method: req.method().to_string(),
            path: req.path().to_string(),
            authorization: authorization.clone(),
        });
        (
            state.fail_next.pop_front(),
            state.hold_next.pop_front(),
            state.latency,
        )
    };
    if let Some(release) = hold {
        release.notified().await;
    }
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
    if let Some(status) = failure {
        return Err(MockError::Injected(status));
    }

    let Some(authorization) = authorization else {
        return Ok(None);
    };
    let token = authorization
        .strip_prefix("Bearer ")
        .ok_or(MockError::Unauthorized)?;
    let account = backend.state().accounts.get(token).cloned();
    account.map(Some).ok_or(MockError::Unauthorized)
}

async fn enter_signed_in(
    req: &HttpRequest,
    backend: &MockBackend,
) -> Result<Account, MockError> {
    enter(req, backend).await?.ok_or(MockError::Unauthorized)
}

fn list_response<T: Serialize>(
    envelope: Envelope,
    items: &[T],
) -> HttpResponse {
    match envelope {
        Envelope::Bare => HttpResponse::Ok().json(items),
        Envelope::Data => HttpResponse::Ok().json(json!({ "data": items })),
        Envelope::Services => {
            HttpResponse::Ok().json(json!({ "services": items }))
        }
    }
}

fn entity_response<T: Serialize>(
    status: StatusCode,
    envelope: Envelope,
    entity: &T,
) -> HttpResponse {
    match envelope {
        Envelope::Data => {
            HttpResponse::build(status).json(json!({ "data": entity }))
        }
        _ => HttpResponse::build(status).json(entity),
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn routes() -> impl HttpServiceFactory {
    web::scope("")
        .service(health_check)
        .service(list_services)
        .service(get_service)
        .service(create_service)
        .service(update_service)
        .service(delete_service)
        .service(list_bookings)
        .service(my_bookings)
        .service(create_booking)
        .service(cancel_booking)
        .service(add_review)
        .service(get_profile)
        .service(update_profile)
        .service(provider_stats)
}

#[get("/health_check")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("healthy")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceQuery {
    category: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
    search: Option<String>,
}

fn parse_price(value: Option<&str>) -> Result<Option<Decimal>, MockError> {
    value
        .map(|v| {
            v.parse::<Decimal>()
                .map_err(|e| MockError::BadRequest(format!("price {v}: {e}")))
        })
        .transpose()
}

impl TryFrom<ServiceQuery> for ServiceFilters {
    type Error = MockError;

    fn try_from(query: ServiceQuery) -> Result<Self, MockError> {
        Ok(ServiceFilters {
            min_price: parse_price(query.min_price.as_deref())?,
            max_price: parse_price(query.max_price.as_deref())?,
            category: query.category,
            search: query.search,
        })
    }
}

#[tracing::instrument(skip(req, backend))]
#[get("/cleaner")]
async fn list_services(
    req: HttpRequest,
    query: web::Query<ServiceQuery>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    enter(&req, &backend).await?;
    let filters = ServiceFilters::try_from(query.into_inner())?;
    let state = backend.state();
    let services: Vec<&Service> = state
        .services
        .iter()
        .filter(|service| filters.matches(service))
        .collect();
    Ok(list_response(state.envelope, &services))
}

#[tracing::instrument(skip(req, backend))]
#[get("/cleaner/{id}")]
async fn get_service(
    req: HttpRequest,
    id: web::Path<String>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    enter(&req, &backend).await?;
    let state = backend.state();
    let service = state
        .services
        .iter()
        .find(|service| service.id.0 == *id)
        .ok_or_else(|| MockError::NotFound(format!("service {id}")))?;
    Ok(entity_response(StatusCode::OK, state.envelope, service))
}

#[tracing::instrument(skip(req, backend))]
#[post("/cleaner")]
async fn create_service(
    req: HttpRequest,
    draft: web::Json<ServiceDraft>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    enter_signed_in(&req, &backend).await?;
    let draft = draft.into_inner();
    let service = Service {
        id: ServiceId(new_id()),
        name: draft.name,
        category: draft.category,
        price: draft.price,
        description: draft.description,
        image_url: draft.image_url,
        provider_name: draft.provider_name,
        provider_email: draft.provider_email,
        rating: 0.0,
        review_count: 0,
        reviews: Vec::new(),
    };
    let mut state = backend.state();
    state.services.insert(0, service.clone());
    Ok(entity_response(StatusCode::CREATED, state.envelope, &service))
}

#[tracing::instrument(skip(req, backend))]
#[patch("/cleaner/{id}")]
async fn update_service(
    req: HttpRequest,
    id: web::Path<String>,
    draft: web::Json<ServiceDraft>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    enter_signed_in(&req, &backend).await?;
    let draft = draft.into_inner();
    let mut state = backend.state();
    let envelope = state.envelope;
    let service = state
        .services
        .iter_mut()
        .find(|service| service.id.0 == *id)
        .ok_or_else(|| MockError::NotFound(format!("service {id}")))?;
    service.name = draft.name;
    service.category = draft.category;
    service.price = draft.price;
    service.description = draft.description;
    service.image_url = draft.image_url;
    service.provider_name = draft.provider_name;
    service.provider_email = draft.provider_email;
    Ok(entity_response(StatusCode::OK, envelope, &*service))
}

#[tracing::instrument(skip(req, backend))]
#[delete("/cleaner/{id}")]
async fn delete_service(
    req: HttpRequest,
    id: web::Path<String>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    enter_signed_in(&req, &backend).await?;
    let mut state = backend.state();
    let before = state.services.len();
    state.services.retain(|service| service.id.0 != *id);
    if state.services.len() == before {
        return Err(MockError::NotFound(format!("service {id}")));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[tracing::instrument(skip(req, backend))]
#[get("/bookings")]
async fn list_bookings(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    enter_signed_in(&req, &backend).await?;
    let state = backend.state();
    let bookings: Vec<&Booking> =
        state.bookings.iter().map(|stored| &stored.booking).collect();
    Ok(list_response(state.envelope, &bookings))
}

#[tracing::instrument(skip(req, backend))]
#[get("/bookings/my-bookings")]
async fn my_bookings(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let account = enter_signed_in(&req, &backend).await?;
    let state = backend.state();
    let bookings: Vec<&Booking> = state
        .bookings
        .iter()
        .filter(|stored| stored.customer_email == account.profile.email)
        .map(|stored| &stored.booking)
        .collect();
    Ok(list_response(state.envelope, &bookings))
}

#[tracing::instrument(skip(req, backend))]
#[post("/bookings")]
async fn create_booking(
    req: HttpRequest,
    details: web::Json<NewBooking>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let account = enter_signed_in(&req, &backend).await?;
    let details = details.into_inner();
    let mut state = backend.state();
    if !state.services.iter().any(|s| s.id == details.service_id) {
        return Err(MockError::NotFound(format!(
            "service {}",
            details.service_id
        )));
    }
    let booking = Booking {
        id: BookingId(new_id()),
        service_id: details.service_id,
        service_name: details.service_name,
        price: details.price,
        provider_email: details.provider_email,
        booking_date: details.booking_date,
        special_requests: details.special_requests,
        status: BookingStatus::Pending,
        review: None,
        created_at: Timestamp::now(),
    };
    state.bookings.insert(
        0,
        StoredBooking {
            customer_email: account.profile.email,
            booking: booking.clone(),
        },
    );
    Ok(entity_response(StatusCode::CREATED, state.envelope, &booking))
}

#[tracing::instrument(skip(req, backend))]
#[delete("/bookings/{id}")]
async fn cancel_booking(
    req: HttpRequest,
    id: web::Path<String>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    enter_signed_in(&req, &backend).await?;
    let mut state = backend.state();
    let position = state
        .bookings
        .iter()
        .position(|stored| stored.booking.id.0 == *id)
        .ok_or_else(|| MockError::NotFound(format!("booking {id}")))?;
    let status = state.bookings[position].booking.status;
    if !status.can_cancel() {
        return Err(MockError::BadRequest(format!(
            "cannot cancel a {status} booking"
        )));
    }
    state.bookings.remove(position);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[tracing::instrument(skip(req, backend))]
#[post("/bookings/{id}/review")]
async fn add_review(
    req: HttpRequest,
    id: web::Path<String>,
    review: web::Json<NewReview>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    enter_signed_in(&req, &backend).await?;
    let review = review.into_inner();
    if !(1..=5).contains(&review.rating) {
        return Err(MockError::BadRequest("rating must be 1 to 5".into()));
    }
    let mut state = backend.state();
    if state.refuse_reviews {
        return Ok(HttpResponse::Ok().json(json!({ "success": false })));
    }
    let stored = state
        .bookings
        .iter_mut()
        .find(|stored| stored.booking.id.0 == *id)
        .ok_or_else(|| MockError::NotFound(format!("booking {id}")))?;
    if !stored.booking.can_review() {
        return Err(MockError::BadRequest(
            "only completed bookings can be reviewed once".into(),
        ));
    }
    let review = Review {
        rating: review.rating,
        comment: review.comment,
        created_at: Timestamp::now(),
    };
    stored.booking.review = Some(review.clone());
    let booking = stored.booking.clone();

    // keep the service's rating in step with its reviews
    if let Some(service) = state
        .services
        .iter_mut()
        .find(|service| service.id == booking.service_id)
    {
        service.reviews.push(review);
        service.review_count = service.reviews.len() as u32;
        service.rating = service.average_review_rating().unwrap_or(0.0);
    }
    Ok(HttpResponse::Ok().json(json!({ "booking": booking })))
}

#[tracing::instrument(skip(req, backend))]
#[get("/users/profile")]
async fn get_profile(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let account = enter_signed_in(&req, &backend).await?;
    Ok(HttpResponse::Ok().json(account.profile))
}

#[tracing::instrument(skip(req, backend))]
#[patch("/users/profile")]
async fn update_profile(
    req: HttpRequest,
    update: web::Json<ProfileUpdate>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    enter_signed_in(&req, &backend).await?;
    let update = update.into_inner();
    let token = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();
    let mut state = backend.state();
    let account = state
        .accounts
        .get_mut(&token)
        .ok_or(MockError::Unauthorized)?;
    if let Some(name) = update.name {
        account.profile.name = name;
    }
    if let Some(photo_url) = update.photo_url {
        account.profile.photo_url = Some(photo_url);
    }
    Ok(HttpResponse::Ok().json(&account.profile))
}

#[tracing::instrument(skip(req, backend))]
#[get("/users/provider-stats")]
async fn provider_stats(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let account = enter_signed_in(&req, &backend).await?;
    let email = account.profile.email;
    let state = backend.state();
    let provided: Vec<&Booking> = state
        .bookings
        .iter()
        .map(|stored| &stored.booking)
        .filter(|booking| booking.provider_email == email)
        .collect();
    let stats = ProviderStats {
        total_services: state
            .services
            .iter()
            .filter(|service| service.provider_email == email)
            .count() as u32,
        total_bookings: provided.len() as u32,
        total_revenue: provided
            .iter()
            .filter(|booking| booking.status == BookingStatus::Completed)
            .map(|booking| booking.price)
            .sum(),
    };
    Ok(HttpResponse::Ok().json(stats))
}

/// Build the server, but not await it.
///
/// Returns the port the server has bound to; pass port 0 to let the OS
/// assign one.
pub fn build(
    backend: MockBackend,
    ip: &str,
    port: u16,
) -> std::io::Result<(Server, u16)> {
    let listener = TcpListener::bind(format!("{ip}:{port}"))?;
    let port = listener.local_addr()?.port();
    let backend = web::Data::new(backend);
    let server = HttpServer::new(move || {
        App::new().service(routes()).app_data(backend.clone())
    })
    .workers(2)
    .listen(listener)?
    .run();
    Ok((server, port))
}
