//! notesync-api - HTTP API server for notesync.
//!
//! The transport layer is a thin dispatcher: handlers decode the
//! request, delegate to the service layer, and encode the result.
//! Everything with invariants (ownership, merge rules, timestamps,
//! identifiers) lives below the services.

pub mod services;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use notesync_core::UpdateNoteRequest;
use notesync_db::{log_pool_metrics, Database};
use services::{IdentityService, NoteService};

/// Request bodies larger than this are rejected before deserialization.
const MAX_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically —
/// useful for log correlation when chasing a misbehaving request.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pool: sqlx::SqlitePool,
    identity: IdentityService,
    notes: NoteService,
}

impl AppState {
    /// Build the state from a connected database, moving each
    /// repository behind its service.
    pub fn new(db: Database) -> Self {
        let Database { pool, users, notes } = db;
        Self {
            pool,
            identity: IdentityService::new(Arc::new(users)),
            notes: NoteService::new(Arc::new(notes)),
        }
    }
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Transport-level error with an HTTP status.
pub enum ApiError {
    Internal(notesync_core::Error),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<notesync_core::Error> for ApiError {
    fn from(err: notesync_core::Error) -> Self {
        use notesync_core::Error;
        match err {
            Error::NotFound(_) => ApiError::NotFound("Note not found or access denied".to_string()),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::DuplicateUsername(_) => {
                ApiError::Conflict("Username already exists".to_string())
            }
            Error::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".to_string()),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                tracing::error!(subsystem = "api", error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Debug, Deserialize)]
struct CredentialsBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl CredentialsBody {
    fn into_parts(self) -> (String, String) {
        // Missing fields become empty strings; the identity service
        // rejects those as InvalidInput, matching missing-field errors.
        (
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct CreateNoteBody {
    user_id: Option<i64>,
    title: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateNoteBody {
    user_id: Option<i64>,
    title: Option<String>,
    content: Option<String>,
}

/// `user_id` carried in the query string for read/delete operations.
#[derive(Debug, Deserialize)]
struct OwnerQuery {
    user_id: Option<i64>,
}

fn require_user_id(user_id: Option<i64>) -> Result<i64, ApiError> {
    user_id.ok_or_else(|| ApiError::BadRequest("User ID is required".to_string()))
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    log_pool_metrics(&state.pool);
    Json(serde_json::json!({ "status": "ok" }))
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = body.into_parts();
    let user_id = state.identity.register(&username, &password).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User registered successfully",
            "user_id": user_id,
        })),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = body.into_parts();
    let user = state.identity.authenticate(&username, &password).await?;

    Ok(Json(serde_json::json!({
        "message": "Login successful",
        "user_id": user.id,
        "username": user.username,
    })))
}

async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = require_user_id(query.user_id)?;
    let notes = state.notes.list(owner_id).await?;
    Ok(Json(serde_json::json!({ "notes": notes })))
}

async fn create_note(
    State(state): State<AppState>,
    Json(body): Json<CreateNoteBody>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = require_user_id(body.user_id)?;
    let note = state.notes.create(owner_id, body.title, body.content).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = require_user_id(query.user_id)?;
    let note = state.notes.get(&id, owner_id).await?;
    Ok(Json(note))
}

async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateNoteBody>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = require_user_id(body.user_id)?;
    let req = UpdateNoteRequest {
        title: body.title,
        content: body.content,
    };
    let note = state.notes.update(&id, owner_id, req).await?;
    Ok(Json(note))
}

async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = require_user_id(query.user_id)?;
    state.notes.delete(&id, owner_id).await?;
    Ok(Json(serde_json::json!({
        "message": "Note deleted successfully",
    })))
}

async fn get_note_html(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = require_user_id(query.user_id)?;
    let rendered = state.notes.render_html(&id, owner_id).await?;
    Ok(Json(rendered))
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Identity
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        // Notes CRUD
        .route("/api/notes", get(list_notes).post(create_note))
        .route(
            "/api/notes/:id",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/api/notes/:id/html", get(get_note_html))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
