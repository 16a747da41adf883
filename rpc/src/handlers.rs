//! HTTP request handlers and their response bodies.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use guardiq_store::{AggregateStatistics, SuspiciousActivityReport};
use guardiq_types::{CallerInfo, SecurityLevel, Timestamp};
use guardiq_verification::{SecurityStatus, VerificationOutcome, VerificationRequest};
use serde::Serialize;
use serde_json::Value;

use crate::server::AppState;
use crate::RpcError;

pub const SERVICE_NAME: &str = "GuardIQ VIP API";
pub const VIP_VERIFIED: &str = "VIP Verified";

// ── Health ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub counters: BTreeMap<&'static str, u64>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        counters: state.pipeline.counters(),
    })
}

// ── Verification ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VipUser {
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub platform: String,
    pub followers: u64,
    pub verification_status: &'static str,
}

impl From<&VerificationRequest> for VipUser {
    fn from(request: &VerificationRequest) -> Self {
        Self {
            full_name: request.full_name.clone(),
            email: request.email.clone(),
            role: request.role.display_name(),
            platform: request.platform.display_name(),
            followers: request.followers,
            verification_status: VIP_VERIFIED,
        }
    }
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<VipUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
}

/// Status code and body for a terminal outcome.
pub fn outcome_response(outcome: &VerificationOutcome) -> (StatusCode, Json<VerifyResponse>) {
    let message = outcome.message();
    let (status, body) = match outcome {
        VerificationOutcome::Verified { request } => (
            StatusCode::OK,
            VerifyResponse {
                success: true,
                message,
                user: Some(VipUser::from(request)),
                blocked: None,
            },
        ),
        VerificationOutcome::Rejected { .. } => (
            StatusCode::UNAUTHORIZED,
            VerifyResponse {
                success: false,
                message,
                user: None,
                blocked: None,
            },
        ),
        VerificationOutcome::Blocked { .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            VerifyResponse {
                success: false,
                message,
                user: None,
                blocked: Some(true),
            },
        ),
    };
    (status, Json(body))
}

/// An unreadable or non-JSON body is treated as no payload at all.
pub async fn verify_vip(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<VerifyResponse>), RpcError> {
    let raw: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let caller = caller_info(connect, &headers);
    let pipeline = state.pipeline.clone();
    let outcome = blocking(move || pipeline.verify(&raw, &caller)).await??;
    Ok(outcome_response(&outcome))
}

fn caller_info(connect: Option<ConnectInfo<SocketAddr>>, headers: &HeaderMap) -> CallerInfo {
    let agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    CallerInfo::new(connect.map(|ConnectInfo(addr)| addr.ip().to_string()), agent)
}

// ── Statistics ───────────────────────────────────────────────────────────

pub async fn vip_stats(
    State(state): State<AppState>,
) -> Result<Json<AggregateStatistics>, RpcError> {
    let pipeline = state.pipeline.clone();
    let stats = blocking(move || pipeline.statistics()).await??;
    Ok(Json(stats))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityStatusResponse {
    pub security_level: SecurityLevel,
    pub success_rate: f64,
    pub total_vips: u64,
    pub recent_activity: u64,
    pub threat_level: u64,
    pub last_updated: String,
}

impl From<SecurityStatus> for SecurityStatusResponse {
    fn from(status: SecurityStatus) -> Self {
        Self {
            security_level: status.level,
            success_rate: status.success_rate,
            total_vips: status.total_vips,
            recent_activity: status.recent_activity,
            threat_level: status.threat_level,
            last_updated: rfc3339(status.computed_at),
        }
    }
}

pub async fn security_status(
    State(state): State<AppState>,
) -> Result<Json<SecurityStatusResponse>, RpcError> {
    let pipeline = state.pipeline.clone();
    let status = blocking(move || pipeline.security_status()).await??;
    Ok(Json(status.into()))
}

// ── Activity ─────────────────────────────────────────────────────────────

pub async fn user_activity(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<SuspiciousActivityReport>, RpcError> {
    let pipeline = state.pipeline.clone();
    let report = blocking(move || pipeline.user_activity(&email)).await??;
    Ok(Json(report))
}

// ── Fallback ─────────────────────────────────────────────────────────────

pub async fn not_found() -> RpcError {
    RpcError::EndpointNotFound
}

/// Store backends are synchronous; keep them off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, RpcError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RpcError::Server(format!("blocking task failed: {e}")))
}

fn rfc3339(ts: Timestamp) -> String {
    i64::try_from(ts.as_secs())
        .ok()
        .and_then(|secs| chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
