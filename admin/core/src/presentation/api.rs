// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Admin HTTP API.
//!
//! All endpoints are `POST` with a JSON body, under the route names the web
//! UI already calls. Handlers check the envelope, authorize, then delegate;
//! nothing is written unless every check passed.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::application::repository_factory::AdminServices;
use crate::domain::dns_record::DnsRecord;
use crate::domain::error::AdminError;
use crate::domain::interaction::{DnsInteraction, HttpInteraction, SmtpInteraction};
use crate::domain::pattern::Pattern;
use crate::domain::payload::{ResourceId, UpdateEnvelope, UpdateOutcome};
use crate::presentation::dto::{
    DeleteRequest, DeleteResponse, DomainSummary, ErrorResponse, KeyRequest, ReadbackRequest,
    RegisterRequest, RegistrationResponse, UpdateDnsRecordRequest, UpdatePatternRequest,
    UpdateResponse,
};

type AppState = Arc<AdminServices>;
type ApiResult<T> = Result<Json<T>, AdminError>;

pub fn app(services: AdminServices) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/createDomain", post(create_domain_handler))
        .route("/api/getDomain", post(get_domain_handler))
        .route("/api/getRequests", post(get_requests_handler))
        .route("/api/getDNSRequests", post(get_dns_requests_handler))
        .route("/api/getSMTPRequests", post(get_smtp_requests_handler))
        .route("/api/getPatterns", post(get_patterns_handler))
        .route("/api/createPattern", post(create_pattern_handler))
        .route("/api/updatePattern", post(update_pattern_handler))
        .route("/api/deletePattern", post(delete_pattern_handler))
        .route("/api/getDnsRecords", post(get_dns_records_handler))
        .route("/api/createDnsRecord", post(create_dns_record_handler))
        .route("/api/updateDnsRecord", post(update_dns_record_handler))
        .route("/api/deleteDnsRecord", post(delete_dns_record_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(services))
}

impl AdminError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::InvalidHost(_)
            | Self::InvalidParameter(_)
            | Self::InvalidVariant(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::DuplicateDomain => StatusCode::FORBIDDEN,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Repository(e) => {
                error!("Storage failure: {}", e);
                "internal storage error".to_string()
            }
            other => other.to_string(),
        };
        (self.status_code(), Json(ErrorResponse { error: message })).into_response()
    }
}

/// `Json` whose rejections are reported as [`AdminError::InvalidRequest`].
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AdminError::InvalidRequest(rejection.body_text())),
        }
    }
}

fn update_response(outcome: UpdateOutcome) -> Json<UpdateResponse> {
    Json(UpdateResponse {
        success: outcome.is_success(),
        matched: outcome.matched(),
    })
}

/// An absent or empty id matches nothing.
fn delete_target(id: Option<String>) -> Option<ResourceId> {
    id.filter(|id| !id.is_empty()).map(ResourceId::new)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

// ============================================================================
// Domains
// ============================================================================

async fn create_domain_handler(
    State(state): State<AppState>,
    Payload(request): Payload<RegisterRequest>,
) -> ApiResult<RegistrationResponse> {
    let registration = state.registry.register(request.host.as_deref()).await?;
    Ok(Json(RegistrationResponse {
        access_key: registration.access_key.as_str().to_string(),
        host: registration.host.as_str().to_string(),
    }))
}

async fn get_domain_handler(
    State(state): State<AppState>,
    Payload(request): Payload<KeyRequest>,
) -> ApiResult<DomainSummary> {
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    let counts = state.registry.describe(&tenant).await?;
    Ok(Json(DomainSummary {
        host: tenant.host().as_str().to_string(),
        request_count_http: counts.http,
        request_count_dns: counts.dns,
        request_count_smtp: counts.smtp,
    }))
}

// ============================================================================
// Interaction readback
// ============================================================================

async fn get_requests_handler(
    State(state): State<AppState>,
    Payload(request): Payload<ReadbackRequest>,
) -> ApiResult<Vec<HttpInteraction>> {
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    let interactions = state
        .interactions
        .list_http(&tenant, request.after.as_ref(), request.pattern_id.as_ref())
        .await?;
    Ok(Json(interactions))
}

async fn get_dns_requests_handler(
    State(state): State<AppState>,
    Payload(request): Payload<ReadbackRequest>,
) -> ApiResult<Vec<DnsInteraction>> {
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    let interactions = state
        .interactions
        .list_dns(&tenant, request.after.as_ref(), request.pattern_id.as_ref())
        .await?;
    Ok(Json(interactions))
}

async fn get_smtp_requests_handler(
    State(state): State<AppState>,
    Payload(request): Payload<ReadbackRequest>,
) -> ApiResult<Vec<SmtpInteraction>> {
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    let interactions = state
        .interactions
        .list_smtp(&tenant, request.after.as_ref(), request.pattern_id.as_ref())
        .await?;
    Ok(Json(interactions))
}

// ============================================================================
// Patterns
// ============================================================================

async fn get_patterns_handler(
    State(state): State<AppState>,
    Payload(request): Payload<KeyRequest>,
) -> ApiResult<Vec<Pattern>> {
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    Ok(Json(state.patterns.list(&tenant).await?))
}

async fn create_pattern_handler(
    State(state): State<AppState>,
    Payload(request): Payload<KeyRequest>,
) -> ApiResult<Pattern> {
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    Ok(Json(state.patterns.create(&tenant).await?))
}

async fn update_pattern_handler(
    State(state): State<AppState>,
    Payload(request): Payload<UpdatePatternRequest>,
) -> ApiResult<UpdateResponse> {
    let envelope = UpdateEnvelope::from_payload(request.response)?;
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    let outcome = state.patterns.update(&tenant, envelope).await?;
    Ok(update_response(outcome))
}

async fn delete_pattern_handler(
    State(state): State<AppState>,
    Payload(request): Payload<DeleteRequest>,
) -> ApiResult<DeleteResponse> {
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    let success = match delete_target(request.id) {
        Some(id) => state.patterns.delete(&tenant, &id).await?,
        None => false,
    };
    Ok(Json(DeleteResponse { success }))
}

// ============================================================================
// DNS records
// ============================================================================

async fn get_dns_records_handler(
    State(state): State<AppState>,
    Payload(request): Payload<KeyRequest>,
) -> ApiResult<Vec<DnsRecord>> {
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    Ok(Json(state.dns_records.list(&tenant).await?))
}

async fn create_dns_record_handler(
    State(state): State<AppState>,
    Payload(request): Payload<KeyRequest>,
) -> ApiResult<DnsRecord> {
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    Ok(Json(state.dns_records.create(&tenant).await?))
}

async fn update_dns_record_handler(
    State(state): State<AppState>,
    Payload(request): Payload<UpdateDnsRecordRequest>,
) -> ApiResult<UpdateResponse> {
    let envelope = UpdateEnvelope::from_payload(request.record)?;
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    let outcome = state.dns_records.update(&tenant, envelope).await?;
    Ok(update_response(outcome))
}

async fn delete_dns_record_handler(
    State(state): State<AppState>,
    Payload(request): Payload<DeleteRequest>,
) -> ApiResult<DeleteResponse> {
    let tenant = state.gate.authorize(request.access_key.as_deref()).await?;
    let success = match delete_target(request.id) {
        Some(id) => state.dns_records.delete(&tenant, &id).await?,
        None => false,
    };
    Ok(Json(DeleteResponse { success }))
}
