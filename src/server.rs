//! DevRank Server
//!
//! HTTP API over the ranked profile service.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::ProfileError;
use crate::github::GitHubClient;
use crate::profile::ActivityStatistics;
use crate::rank::{RankResult, ScoreWeights, Tier};
use crate::service::{ProfileService, RankedProfile};
use crate::storage::CredentialStore;

pub struct AppState {
    pub service: ProfileService,
    pub storage: Arc<CredentialStore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: ProfileService, storage: Arc<CredentialStore>) -> Self {
        Self {
            service,
            storage,
            started_at: Instant::now(),
        }
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unable to retrieve profile: {0}")]
    BadGateway(#[from] ProfileError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

/// Log a storage failure and hide its detail from the client.
fn internal(message: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
    move |e| {
        error!("{}: {:#}", message, e);
        ApiError::Internal(message.to_string())
    }
}

/// JSON request body whose rejection is reported through the envelope.
///
/// Counts in [`ActivityStatistics`] are unsigned, so a negative count is
/// refused here with a 400 rather than ranked.
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

// ============================================================================
// AUTHENTICATION
// ============================================================================

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Authorization header required".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty() && !t.contains(' '))
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header format".to_string()))
}

/// User id resolved from an `Authorization: Bearer <session>` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        state
            .storage
            .resolve_session(token)
            .map_err(internal("Failed to resolve session"))?
            .map(AuthUser)
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))
    }
}

// ============================================================================
// ROUTES
// ============================================================================

pub fn create_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/github/profile", get(profile_handler))
        .route("/api/github/credentials", put(update_credentials_handler))
        .route("/api/session", delete(logout_handler))
        .route("/api/rank", post(rank_handler))
        .route("/api/rank/tiers", get(tiers_handler))
        .layer(cors)
        .with_state(state)
}

/// CORS policy for `origin`; "*" allows any origin without credentials.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE];

    if origin == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(300)));
    }

    let origin: HeaderValue = origin
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(true)
        .max_age(Duration::from_secs(300)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub uptime: String,
    pub version: String,
    pub active_sessions: u32,
}

/// `1h 2m 3s`, `4m 5s` or `6s`
pub fn format_duration(d: Duration) -> String {
    let total = d.as_secs();
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<HealthStatus>>, ApiError> {
    let active_sessions = state
        .storage
        .active_session_count()
        .map_err(internal("Failed to count sessions"))?;

    Ok(Json(ApiResponse::ok(HealthStatus {
        status: "ok".to_string(),
        uptime: format_duration(state.started_at.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions,
    })))
}

/// Revoke the session used to make this request.
async fn logout_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let token = bearer_token(&headers)?;
    state
        .storage
        .revoke_session(token)
        .map_err(internal("Failed to revoke session"))?;

    info!("User {} logged out", user_id);
    Ok(Json(ApiResponse {
        success: true,
        data: None,
        message: Some("Logged out".to_string()),
    }))
}

async fn profile_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<RankedProfile>>, ApiError> {
    let credentials = state
        .storage
        .github_credentials(user_id)
        .map_err(internal("Failed to load GitHub credentials"))?
        .filter(|c| c.is_complete())
        .ok_or_else(|| {
            ApiError::BadRequest(
                "GitHub username or token not configured. Please update your profile first."
                    .to_string(),
            )
        })?;

    let ranked = state
        .service
        .ranked_profile(&credentials.github_username, &credentials.github_token)
        .await
        .map_err(|e| {
            warn!("Profile request for user {} failed: {}", user_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(ApiResponse::ok(ranked)))
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateCredentialsRequest {
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub github_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCredentialsResponse {
    pub message: String,
    pub github_username: String,
}

async fn update_credentials_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    ApiJson(request): ApiJson<UpdateCredentialsRequest>,
) -> Result<Json<ApiResponse<UpdateCredentialsResponse>>, ApiError> {
    let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
    if blank(&request.github_username) && blank(&request.github_token) {
        return Err(ApiError::BadRequest(
            "GitHub username or token required".to_string(),
        ));
    }

    let credentials = state
        .storage
        .update_github_credentials(
            user_id,
            request.github_username.as_deref(),
            request.github_token.as_deref(),
        )
        .map_err(internal("Failed to update GitHub credentials"))?;

    info!("User {} updated GitHub credentials", user_id);

    Ok(Json(ApiResponse::ok(UpdateCredentialsResponse {
        message: "GitHub credentials updated successfully".to_string(),
        github_username: credentials.github_username,
    })))
}

async fn rank_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(stats): ApiJson<ActivityStatistics>,
) -> Json<ApiResponse<RankResult>> {
    Json(ApiResponse::ok(state.service.engine().compute_rank(&stats)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankTableResponse {
    pub weights: ScoreWeights,
    pub tiers: Vec<Tier>,
}

async fn tiers_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse<RankTableResponse>> {
    let engine = state.service.engine();
    Json(ApiResponse::ok(RankTableResponse {
        weights: *engine.weights(),
        tiers: engine.table().tiers().to_vec(),
    }))
}

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Periodically drop expired sessions.
pub fn spawn_session_purge(storage: Arc<CredentialStore>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match storage.purge_expired_sessions() {
                Ok(0) => {}
                Ok(n) => info!("Purged {} expired sessions", n),
                Err(e) => error!("Session purge failed: {}", e),
            }
        }
    });
}

/// Serve on an already-bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>, cors: CorsLayer) -> anyhow::Result<()> {
    let app = create_router(state, cors);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run the server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>, cors: CorsLayer) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);

    info!("Starting DevRank server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    serve(listener, state, cors).await
}

/// Wire storage, GitHub client and rank engine from `config`, then serve.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engine = config.rank_engine()?;
    let storage = Arc::new(CredentialStore::open(&config.database.path)?);
    let source = Arc::new(GitHubClient::new(&config.github));
    let service = ProfileService::new(source, engine);
    let cors = cors_layer(&config.server.cors_origin)?;

    spawn_session_purge(storage.clone(), config.session.purge_interval());
    info!(
        "Session purge running every {}s",
        config.session.purge_interval().as_secs()
    );
    info!("CORS enabled for: {}", config.server.cors_origin);

    let state = Arc::new(AppState::new(service, storage));
    run_server(&config.server.host, config.server.port, state, cors).await
}
