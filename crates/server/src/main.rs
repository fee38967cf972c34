// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP server for the travel request portal.
//!
//! Exposes the API boundary over JSON endpoints with bearer-token
//! sessions. All workflow rules live below this layer; handlers only
//! translate between the wire and the API crate.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};

use trp_api::{
    ActionResponse, AdminActionRequest, ApiError, CreateAccountRequest, CreateAccountResponse,
    DeleteResponse, DuplicateCache, EditRequestBody, GroupedRequestsResponse, LoginRequest,
    LoginResponse, ManagerActionRequest, MarkPaidResponse, NotificationInfo, RequestInfo,
    SubmitVisitRequest, SubmitVisitResponse, UnreadCountResponse, WhoAmIResponse,
};
use trp_audit::Cause;
use trp_persistence::{PersistenceError, SqlitePersistence};

use crate::session::SessionActor;

/// Travel Request Portal - HTTP server for the approval workflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Create an ADMIN account with this password if no accounts exist yet
    #[arg(long)]
    seed_admin_password: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for requests, accounts, and sessions.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Per-employee cache backing the same-day duplicate guard.
    duplicate_cache: Arc<Mutex<DuplicateCache>>,
}

/// Wire request for POST `/login`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct LoginApiRequest {
    login_name: String,
    password: String,
}

/// Wire request for POST `/accounts`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateAccountApiRequest {
    login_name: String,
    display_name: String,
    password: String,
    confirmation: String,
    role: String,
}

/// Wire request for POST `/requests`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SubmitApiRequest {
    site_city: String,
    project: String,
    reason: String,
    duration_days: u32,
    #[serde(default)]
    advance: Option<f64>,
    #[serde(default)]
    date_of_journey: Option<Date>,
}

/// Wire request for PATCH `/requests/{id}/status`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ManagerActionApiRequest {
    action: String,
    #[serde(default)]
    comment: Option<String>,
}

/// Wire request for POST `/requests/{id}/admin-action`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AdminActionApiRequest {
    action: String,
    #[serde(default)]
    rejection_reason: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    confirmed: bool,
}

/// Wire request for PATCH `/requests/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct EditApiRequest {
    #[serde(default)]
    advance: Option<f64>,
    #[serde(default)]
    duration_days: Option<u32>,
    #[serde(default)]
    comment: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            // Rule violations are conflicts with current workflow state;
            // stale clients are expected to re-fetch.
            ApiError::DomainRuleViolation { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Builds the audit cause for one HTTP request.
fn request_cause(endpoint: &str) -> Cause {
    Cause::new(
        format!("http-{}", OffsetDateTime::now_utc().unix_timestamp_nanos()),
        format!("HTTP {endpoint}"),
    )
}

/// Handler for GET `/health`.
async fn handle_health() -> &'static str {
    "ok"
}

/// Handler for POST `/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginApiRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = trp_api::login(
        &mut persistence,
        LoginRequest {
            login_name: req.login_name,
            password: req.password,
        },
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let token: &str = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing Authorization header"),
        })?;

    let mut persistence = app_state.persistence.lock().await;
    trp_api::logout(&mut persistence, token)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/whoami`.
async fn handle_whoami(SessionActor(actor): SessionActor) -> Json<WhoAmIResponse> {
    Json(trp_api::whoami(&actor))
}

/// Handler for POST `/accounts`.
async fn handle_create_account(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<CreateAccountApiRequest>,
) -> Result<Json<CreateAccountResponse>, HttpError> {
    info!(login_name = %req.login_name, role = %req.role, "Handling create_account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateAccountResponse = trp_api::create_account(
        &mut persistence,
        CreateAccountRequest {
            login_name: req.login_name,
            display_name: req.display_name,
            password: req.password,
            confirmation: req.confirmation,
            role: req.role,
        },
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/requests`.
async fn handle_submit_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<SubmitApiRequest>,
) -> Result<Json<SubmitVisitResponse>, HttpError> {
    info!(
        employee = %actor.login_name,
        project = %req.project,
        "Handling submit_request request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let mut cache = app_state.duplicate_cache.lock().await;
    let response: SubmitVisitResponse = trp_api::submit_request(
        &mut persistence,
        SubmitVisitRequest {
            site_city: req.site_city,
            project: req.project,
            reason: req.reason,
            duration_days: req.duration_days,
            advance: req.advance,
            date_of_journey: req.date_of_journey,
        },
        &actor,
        &mut cache,
        request_cause("POST /requests"),
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for GET `/requests`.
async fn handle_list_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<GroupedRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: GroupedRequestsResponse = trp_api::list_requests(&mut persistence, &actor)?;
    Ok(Json(response))
}

/// Handler for GET `/requests/mine`.
async fn handle_list_my_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<GroupedRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: GroupedRequestsResponse = trp_api::list_my_requests(&mut persistence, &actor)?;
    Ok(Json(response))
}

/// Rejects notification access when the path role is not the caller's.
fn require_role_match(actor: &trp_api::AuthenticatedActor, role: &str) -> Result<(), HttpError> {
    if actor.role.as_str() == role {
        Ok(())
    } else {
        Err(HttpError {
            status: StatusCode::FORBIDDEN,
            message: format!("notifications for role '{role}' belong to another inbox"),
        })
    }
}

/// Handler for GET `/requests/{id}`.
async fn handle_get_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(request_id): Path<i64>,
) -> Result<Json<RequestInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RequestInfo = trp_api::get_request(&mut persistence, request_id, &actor)?;
    Ok(Json(response))
}

/// Handler for PATCH `/requests/{id}/status`.
async fn handle_manager_action(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(request_id): Path<i64>,
    Json(req): Json<ManagerActionApiRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    info!(
        request_id,
        manager = %actor.login_name,
        action = %req.action,
        "Handling manager_action request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ActionResponse = trp_api::manager_action(
        &mut persistence,
        request_id,
        ManagerActionRequest {
            action: req.action,
            comment: req.comment,
        },
        &actor,
        request_cause("PATCH /requests/{id}/status"),
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/requests/{id}/admin-action`.
async fn handle_admin_action(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(request_id): Path<i64>,
    Json(req): Json<AdminActionApiRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    info!(
        request_id,
        admin = %actor.login_name,
        action = %req.action,
        "Handling admin_action request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ActionResponse = trp_api::admin_action(
        &mut persistence,
        request_id,
        AdminActionRequest {
            action: req.action,
            rejection_reason: req.rejection_reason,
            comment: req.comment,
            confirmed: req.confirmed,
        },
        &actor,
        request_cause("POST /requests/{id}/admin-action"),
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for PATCH `/requests/{id}`.
async fn handle_edit_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(request_id): Path<i64>,
    Json(req): Json<EditApiRequest>,
) -> Result<Json<ActionResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ActionResponse = trp_api::edit_request(
        &mut persistence,
        request_id,
        EditRequestBody {
            advance: req.advance,
            duration_days: req.duration_days,
            comment: req.comment,
        },
        &actor,
        request_cause("PATCH /requests/{id}"),
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for PATCH `/requests/{id}/mark-paid`.
async fn handle_mark_paid(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(request_id): Path<i64>,
) -> Result<Json<MarkPaidResponse>, HttpError> {
    info!(request_id, paid_by = %actor.login_name, "Handling mark_paid request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MarkPaidResponse = trp_api::mark_paid(
        &mut persistence,
        request_id,
        &actor,
        request_cause("PATCH /requests/{id}/mark-paid"),
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for DELETE `/requests/{id}`.
async fn handle_delete_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(request_id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    info!(request_id, employee = %actor.login_name, "Handling delete_request request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = trp_api::delete_request(
        &mut persistence,
        request_id,
        &actor,
        request_cause("DELETE /requests/{id}"),
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for GET `/notifications/{role}`.
async fn handle_list_notifications(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(role): Path<String>,
) -> Result<Json<Vec<NotificationInfo>>, HttpError> {
    require_role_match(&actor, &role)?;
    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<NotificationInfo> =
        trp_api::list_notifications(&mut persistence, &actor, OffsetDateTime::now_utc())?;
    Ok(Json(response))
}

/// Handler for GET `/notifications/{role}/unread-count`.
async fn handle_unread_count(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(role): Path<String>,
) -> Result<Json<UnreadCountResponse>, HttpError> {
    require_role_match(&actor, &role)?;
    let mut persistence = app_state.persistence.lock().await;
    let response: UnreadCountResponse = trp_api::unread_notifications(&mut persistence, &actor)?;
    Ok(Json(response))
}

/// Handler for POST `/notifications/{role}/read/{notification_id}`.
async fn handle_mark_notification_read(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path((role, notification_id)): Path<(String, i64)>,
) -> Result<StatusCode, HttpError> {
    require_role_match(&actor, &role)?;
    let mut persistence = app_state.persistence.lock().await;
    trp_api::mark_notification_read(&mut persistence, notification_id, &actor)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/notifications/{role}/mark-all-read`.
async fn handle_mark_all_read(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(role): Path<String>,
) -> Result<StatusCode, HttpError> {
    require_role_match(&actor, &role)?;
    let mut persistence = app_state.persistence.lock().await;
    trp_api::mark_all_notifications_read(&mut persistence, &actor)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/export/paid.csv`.
async fn handle_export_paid(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let csv: Vec<u8> = trp_api::export_paid_register(&mut persistence, &actor)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        csv,
    )
        .into_response())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/whoami", get(handle_whoami))
        .route("/accounts", post(handle_create_account))
        .route("/requests", post(handle_submit_request))
        .route("/requests", get(handle_list_requests))
        .route("/requests/mine", get(handle_list_my_requests))
        .route("/requests/{request_id}", get(handle_get_request))
        .route("/requests/{request_id}", patch(handle_edit_request))
        .route("/requests/{request_id}", delete(handle_delete_request))
        .route(
            "/requests/{request_id}/status",
            patch(handle_manager_action),
        )
        .route(
            "/requests/{request_id}/admin-action",
            post(handle_admin_action),
        )
        .route("/requests/{request_id}/mark-paid", patch(handle_mark_paid))
        .route("/notifications/{role}", get(handle_list_notifications))
        .route(
            "/notifications/{role}/unread-count",
            get(handle_unread_count),
        )
        .route(
            "/notifications/{role}/read/{notification_id}",
            post(handle_mark_notification_read),
        )
        .route(
            "/notifications/{role}/mark-all-read",
            post(handle_mark_all_read),
        )
        .route("/export/paid.csv", get(handle_export_paid))
        .with_state(app_state)
}

/// Creates the ADMIN account when the store is empty and a seed password
/// was provided on the command line.
fn seed_admin(
    persistence: &mut SqlitePersistence,
    password: &str,
) -> Result<(), PersistenceError> {
    if persistence.list_accounts()?.is_empty() {
        persistence.create_account(
            "ADMIN",
            "Administrator",
            password,
            "admin",
            OffsetDateTime::now_utc(),
        )?;
        info!("Seeded ADMIN account");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Travel Request Portal server");

    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    if let Some(password) = &args.seed_admin_password {
        seed_admin(&mut persistence, password)?;
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        duplicate_cache: Arc::new(Mutex::new(DuplicateCache::new())),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            duplicate_cache: Arc::new(Mutex::new(DuplicateCache::new())),
        }
    }

    async fn seed_account(state: &AppState, login_name: &str, role: &str) {
        let mut persistence = state.persistence.lock().await;
        persistence
            .create_account(
                login_name,
                "Test User",
                "tr4velDesk",
                role,
                OffsetDateTime::now_utc(),
            )
            .expect("account creation should succeed");
    }

    async fn login_token(state: &AppState, login_name: &str) -> String {
        let app = build_router(state.clone());
        let body = serde_json::json!({
            "login_name": login_name,
            "password": "tr4velDesk",
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: LoginResponse = serde_json::from_slice(&bytes).unwrap();
        parsed.session_token
    }

    async fn submit_request_as(state: &AppState, token: &str) -> HttpStatusCode {
        let app = build_router(state.clone());
        let body = serde_json::json!({
            "site_city": "Pune",
            "project": "Boiler Upgrade",
            "reason": "Commissioning support",
            "duration_days": 3,
            "advance": 1500.0,
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/requests")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let state = create_test_app_state();
        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_requests_require_a_session() {
        let state = create_test_app_state();
        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/requests")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_employee_can_log_in_and_submit() {
        let state = create_test_app_state();
        seed_account(&state, "RAVI", "employee").await;
        let token = login_token(&state, "RAVI").await;

        let status = submit_request_as(&state, &token).await;
        assert_eq!(status, HttpStatusCode::OK);

        let app = build_router(state.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/requests")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let grouped: GroupedRequestsResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(grouped.pending.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_a_conflict() {
        let state = create_test_app_state();
        seed_account(&state, "RAVI", "employee").await;
        let token = login_token(&state, "RAVI").await;

        assert_eq!(submit_request_as(&state, &token).await, HttpStatusCode::OK);
        assert_eq!(
            submit_request_as(&state, &token).await,
            HttpStatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_manager_cannot_submit_requests() {
        let state = create_test_app_state();
        seed_account(&state, "SUNIL", "manager").await;
        let token = login_token(&state, "SUNIL").await;

        assert_eq!(
            submit_request_as(&state, &token).await,
            HttpStatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_employee_cannot_record_admin_decisions() {
        let state = create_test_app_state();
        seed_account(&state, "RAVI", "employee").await;
        seed_account(&state, "SUNIL", "manager").await;
        let employee_token = login_token(&state, "RAVI").await;
        assert_eq!(
            submit_request_as(&state, &employee_token).await,
            HttpStatusCode::OK
        );

        let app = build_router(state.clone());
        let body = serde_json::json!({
            "action": "approve",
            "confirmed": true,
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/requests/1/admin-action")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {employee_token}"))
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_manager_decision_via_status_route() {
        let state = create_test_app_state();
        seed_account(&state, "RAVI", "employee").await;
        seed_account(&state, "SUNIL", "manager").await;
        let employee_token = login_token(&state, "RAVI").await;
        assert_eq!(
            submit_request_as(&state, &employee_token).await,
            HttpStatusCode::OK
        );

        let manager_token = login_token(&state, "SUNIL").await;
        let app = build_router(state.clone());
        let body = serde_json::json!({ "action": "approve" });
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/requests/1/status")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {manager_token}"))
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let action: ActionResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(action.status, "approved");
        assert_eq!(action.admin_status, "pending");
    }

    #[tokio::test]
    async fn test_notification_inbox_is_scoped_to_the_session_role() {
        let state = create_test_app_state();
        seed_account(&state, "RAVI", "employee").await;
        let token = login_token(&state, "RAVI").await;

        let app = build_router(state.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/notifications/manager")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/notifications/employee")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_logout_invalidates_the_token() {
        let state = create_test_app_state();
        seed_account(&state, "RAVI", "employee").await;
        let token = login_token(&state, "RAVI").await;

        let app = build_router(state.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NO_CONTENT);

        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_export_requires_accounts_role() {
        let state = create_test_app_state();
        seed_account(&state, "RAVI", "employee").await;
        seed_account(&state, "PRIYA", "accounts").await;

        let employee_token = login_token(&state, "RAVI").await;
        let app = build_router(state.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/export/paid.csv")
                    .header("Authorization", format!("Bearer {employee_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        let accounts_token = login_token(&state, "PRIYA").await;
        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/export/paid.csv")
                    .header("Authorization", format!("Bearer {accounts_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/csv; charset=utf-8")
        );
    }
}
