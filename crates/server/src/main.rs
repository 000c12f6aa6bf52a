// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use crate::session::SessionUser;
use resa_api::{
    ApiError, BookingResponse, CreateBookingRequest, CreateResourceRequest, CreateUserRequest,
    LoginRequest, LoginResponse, ResourceResponse, UpdateBookingRequest, UserResponse, handlers,
};
use resa_persistence::SqlitePersistence;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Resa Server - HTTP server for the resa booking backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// `SQLite` database file. Omitted means a fresh in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// TCP port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for users, sessions, resources, and bookings.
    persistence: Arc<Mutex<SqlitePersistence>>,
}

/// API response for the root greeting endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GreetingResponse {
    /// The greeting message.
    #[serde(rename = "Hello")]
    hello: String,
}

/// Query parameters for listing bookings.
#[derive(Debug, Deserialize)]
struct ListBookingsQuery {
    /// Number of records to skip.
    #[serde(default)]
    offset: i64,
    /// Maximum number of records to return.
    #[serde(default = "default_limit")]
    limit: i64,
    /// Case-insensitive title substring filter.
    title: Option<String>,
}

/// Query parameters for listing resources.
#[derive(Debug, Deserialize)]
struct ListResourcesQuery {
    /// Number of records to skip.
    #[serde(default)]
    offset: i64,
    /// Maximum number of records to return.
    #[serde(default = "default_limit")]
    limit: i64,
    /// Case-insensitive name substring filter.
    name: Option<String>,
    /// Case-insensitive location substring filter.
    location: Option<String>,
}

/// Query parameters for listing users.
#[derive(Debug, Deserialize)]
struct ListUsersQuery {
    /// Number of records to skip.
    #[serde(default)]
    offset: i64,
    /// Maximum number of records to return.
    #[serde(default = "default_limit")]
    limit: i64,
}

/// Default page size for list endpoints.
const fn default_limit() -> i64 {
    100
}

/// JSON body sent with every error status.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Always `true`, so clients can recognize error bodies by shape.
    error: bool,
    /// Human-readable description of what went wrong.
    message: String,
}

/// Status code plus message, rendered as the standard error body.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The message placed in the response body.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: ErrorResponse = ErrorResponse {
            error: true,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } | ApiError::Unauthorized { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::TemporalRuleViolation { .. }
            | ApiError::SlotConflict { .. }
            | ApiError::DomainRuleViolation { .. }
            | ApiError::InvalidInput { .. }
            | ApiError::PasswordPolicyViolation { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::NotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error while handling request");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Extracts the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, HttpError> {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing or invalid Authorization header"),
        })
}

/// Handler for GET `/` endpoint.
///
/// Returns a fixed greeting, usable as a liveness probe.
#[allow(clippy::unused_async)]
async fn handle_root() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        hello: String::from("World!"),
    })
}

/// Handler for POST `/login` endpoint.
///
/// Authenticates a user by email and password and opens a new session.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = handlers::login(&mut persistence, &req)?;
    drop(persistence);

    info!(user_id = response.user_id, "Login succeeded");

    Ok(Json(response))
}

/// Handler for POST `/logout` endpoint.
///
/// Deletes the presented session. Succeeds even if the token is no
/// longer active.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let token: &str = bearer_token(&headers)?;
    info!("Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    handlers::logout(&mut persistence, token)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/me` endpoint.
///
/// Returns the profile of the currently authenticated user.
#[allow(clippy::unused_async)]
async fn handle_whoami(
    SessionUser(actor, user): SessionUser,
) -> Result<Json<UserResponse>, HttpError> {
    info!(user_id = actor.id, "Handling whoami request");

    let response: UserResponse = handlers::whoami(&user)?;

    Ok(Json(response))
}

/// Handler for POST `/users` endpoint.
///
/// Registers a new user account. Registration is open and does not
/// require an existing session.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, HttpError> {
    info!(email = %req.email, "Handling create_user request");

    let mut persistence = app_state.persistence.lock().await;
    let response: UserResponse = handlers::create_user(&mut persistence, req)?;
    drop(persistence);

    info!(user_id = response.id, "Successfully created user");

    Ok(Json(response))
}

/// Handler for GET `/users` endpoint.
///
/// Lists user accounts with pagination.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, HttpError> {
    info!(user_id = actor.id, "Handling list_users request");

    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<UserResponse> =
        handlers::list_users(&mut persistence, query.offset, query.limit)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/users/{user_id}` endpoint.
///
/// Returns a single user account by ID.
async fn handle_get_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, HttpError> {
    info!(
        user_id = actor.id,
        target_user_id = user_id,
        "Handling get_user request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: UserResponse = handlers::get_user(&mut persistence, user_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/users/{user_id}` endpoint.
///
/// Deletes a user account along with its sessions and bookings.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(
        user_id = actor.id,
        target_user_id = user_id,
        "Handling delete_user request"
    );

    let mut persistence = app_state.persistence.lock().await;
    handlers::delete_user(&mut persistence, user_id, &actor)?;
    drop(persistence);

    info!(target_user_id = user_id, "Successfully deleted user");

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/resources` endpoint.
///
/// Creates a new bookable resource.
async fn handle_create_resource(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreateResourceRequest>,
) -> Result<Json<ResourceResponse>, HttpError> {
    info!(user_id = actor.id, name = %req.name, "Handling create_resource request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ResourceResponse = handlers::create_resource(&mut persistence, req, &actor)?;
    drop(persistence);

    info!(resource_id = response.id, "Successfully created resource");

    Ok(Json(response))
}

/// Handler for GET `/resources` endpoint.
///
/// Lists resources with pagination and optional name and location filters.
async fn handle_list_resources(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Query(query): Query<ListResourcesQuery>,
) -> Result<Json<Vec<ResourceResponse>>, HttpError> {
    info!(user_id = actor.id, "Handling list_resources request");

    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<ResourceResponse> = handlers::list_resources(
        &mut persistence,
        query.offset,
        query.limit,
        query.name.as_deref(),
        query.location.as_deref(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/resources/{resource_id}` endpoint.
///
/// Returns a single resource by ID.
async fn handle_get_resource(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(resource_id): Path<i64>,
) -> Result<Json<ResourceResponse>, HttpError> {
    info!(
        user_id = actor.id,
        resource_id = resource_id,
        "Handling get_resource request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ResourceResponse = handlers::get_resource(&mut persistence, resource_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/resources/{resource_id}` endpoint.
///
/// Deletes a resource along with any bookings that reference it.
async fn handle_delete_resource(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(resource_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(
        user_id = actor.id,
        resource_id = resource_id,
        "Handling delete_resource request"
    );

    let mut persistence = app_state.persistence.lock().await;
    handlers::delete_resource(&mut persistence, resource_id, &actor)?;
    drop(persistence);

    info!(resource_id = resource_id, "Successfully deleted resource");

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/bookings` endpoint.
///
/// Books a time slot on a resource for the authenticated user.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, HttpError> {
    info!(
        owner_id = actor.id,
        resource_id = req.resource_id,
        "Handling create_booking request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: BookingResponse = handlers::create_booking(&mut persistence, req, &actor)?;
    drop(persistence);

    info!(booking_id = response.id, "Successfully created booking");

    Ok(Json(response))
}

/// Handler for GET `/bookings` endpoint.
///
/// Lists the authenticated user's bookings with pagination and an
/// optional title filter.
async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, HttpError> {
    info!(user_id = actor.id, "Handling list_bookings request");

    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<BookingResponse> = handlers::list_bookings(
        &mut persistence,
        &actor,
        query.offset,
        query.limit,
        query.title.as_deref(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/bookings/all` endpoint.
///
/// Lists bookings across all owners. Restricted to administrators.
async fn handle_list_all_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, HttpError> {
    info!(user_id = actor.id, "Handling list_all_bookings request");

    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<BookingResponse> = handlers::list_all_bookings(
        &mut persistence,
        &actor,
        query.offset,
        query.limit,
        query.title.as_deref(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/bookings/{booking_id}` endpoint.
///
/// Returns a single booking by ID if it is visible to the
/// authenticated user.
async fn handle_get_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingResponse>, HttpError> {
    info!(
        user_id = actor.id,
        booking_id = booking_id,
        "Handling get_booking request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: BookingResponse = handlers::get_booking(&mut persistence, booking_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/bookings/{booking_id}` endpoint.
///
/// Reschedules a booking, possibly onto a different resource.
async fn handle_update_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(booking_id): Path<i64>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, HttpError> {
    info!(
        user_id = actor.id,
        booking_id = booking_id,
        resource_id = req.resource_id,
        "Handling update_booking request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: BookingResponse =
        handlers::update_booking(&mut persistence, booking_id, req, &actor)?;
    drop(persistence);

    info!(booking_id = response.id, "Successfully updated booking");

    Ok(Json(response))
}

/// Handler for DELETE `/bookings/{booking_id}` endpoint.
///
/// Cancels a booking if it is visible to the authenticated user and
/// has not already ended.
async fn handle_delete_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(booking_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(
        user_id = actor.id,
        booking_id = booking_id,
        "Handling delete_booking request"
    );

    let mut persistence = app_state.persistence.lock().await;
    handlers::delete_booking(&mut persistence, booking_id, &actor)?;
    drop(persistence);

    info!(booking_id = booking_id, "Successfully deleted booking");

    Ok(StatusCode::NO_CONTENT)
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/me", get(handle_whoami))
        .route("/users", post(handle_create_user))
        .route("/users", get(handle_list_users))
        .route("/users/{user_id}", get(handle_get_user))
        .route("/users/{user_id}", delete(handle_delete_user))
        .route("/resources", post(handle_create_resource))
        .route("/resources", get(handle_list_resources))
        .route("/resources/{resource_id}", get(handle_get_resource))
        .route("/resources/{resource_id}", delete(handle_delete_resource))
        .route("/bookings", post(handle_create_booking))
        .route("/bookings", get(handle_list_bookings))
        .route("/bookings/all", get(handle_list_all_bookings))
        .route("/bookings/{booking_id}", get(handle_get_booking))
        .route("/bookings/{booking_id}", put(handle_update_booking))
        .route("/bookings/{booking_id}", delete(handle_delete_booking))
        .with_state(app_state)
}

/// Installs the fmt subscriber, honoring `RUST_LOG` and defaulting to `info`.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    init_tracing();
    info!("Initializing Resa Server");

    let persistence: SqlitePersistence = match &args.database {
        Some(path) => {
            info!("Opening database file {path}");
            SqlitePersistence::new_with_file(path)?
        }
        None => {
            info!("No database file given, running in memory");
            SqlitePersistence::new_in_memory()?
        }
    };

    let app: Router = build_router(AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    });

    let addr: SocketAddr = SocketAddr::from(([127, 0, 0, 1], args.port));
    info!("Listening on {addr}");

    let listener: TcpListener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use time::{Duration, OffsetDateTime};
    use tower::ServiceExt;

    /// Password that satisfies the registration password policy.
    const TEST_PASSWORD: &str = "Sup3rSecret!pw";

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    /// Helper to produce an ISO 8601 timestamp the given hours from now.
    fn hours_from_now(hours: i64) -> String {
        resa_domain::format_timestamp(OffsetDateTime::now_utc() + Duration::hours(hours))
            .expect("Failed to format timestamp")
    }

    /// Helper to send a JSON request with an optional bearer token.
    async fn send_json(
        app: Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request: Request<Body> = builder
            .body(body.map_or_else(Body::empty, Body::from))
            .expect("Failed to build request");
        app.oneshot(request).await.expect("Failed to send request")
    }

    /// Helper to deserialize a JSON response body.
    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body_bytes).expect("Failed to deserialize response body")
    }

    /// Helper to read a response body as plain text.
    async fn read_text(response: Response) -> String {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        String::from_utf8(body_bytes.to_vec()).expect("Response body was not UTF-8")
    }

    /// Helper to register a user over HTTP and return the created account.
    async fn register_user(app: &Router, email: &str, role: &str) -> UserResponse {
        let request: CreateUserRequest = CreateUserRequest {
            name: String::from("Test User"),
            email: email.to_string(),
            password: String::from(TEST_PASSWORD),
            role: role.to_string(),
        };
        let body: String = serde_json::to_string(&request).expect("Failed to serialize request");
        let response = send_json(app.clone(), "POST", "/users", None, Some(body)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        read_json(response).await
    }

    /// Helper to log a user in over HTTP and return the session token.
    async fn login_user(app: &Router, email: &str) -> String {
        let request: LoginRequest = LoginRequest {
            email: email.to_string(),
            password: String::from(TEST_PASSWORD),
        };
        let body: String = serde_json::to_string(&request).expect("Failed to serialize request");
        let response = send_json(app.clone(), "POST", "/login", None, Some(body)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let login: LoginResponse = read_json(response).await;
        login.session_token
    }

    /// Helper to create a resource over HTTP with the given session.
    async fn create_resource(app: &Router, token: &str, name: &str) -> ResourceResponse {
        let request: CreateResourceRequest = CreateResourceRequest {
            name: name.to_string(),
            location: Some(String::from("Building A")),
            capacity: 10,
            room_type: String::from("meeting_room"),
        };
        let body: String = serde_json::to_string(&request).expect("Failed to serialize request");
        let response = send_json(app.clone(), "POST", "/resources", Some(token), Some(body)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        read_json(response).await
    }

    /// Helper to build a JSON body for a booking request.
    fn booking_body(title: &str, resource_id: i64, start_hours: i64, end_hours: i64) -> String {
        let request: CreateBookingRequest = CreateBookingRequest {
            title: title.to_string(),
            start: hours_from_now(start_hours),
            end: hours_from_now(end_hours),
            resource_id,
        };
        serde_json::to_string(&request).expect("Failed to serialize request")
    }

    #[tokio::test]
    async fn test_root_returns_greeting() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let value: serde_json::Value = read_json(response).await;
        assert_eq!(value, serde_json::json!({"Hello": "World!"}));
    }

    #[tokio::test]
    async fn test_register_login_and_fetch_profile() {
        let app: Router = build_router(create_test_app_state());

        let created: UserResponse = register_user(&app, "booker@example.com", "user").await;
        assert!(created.id > 0);
        assert_eq!(created.email, "booker@example.com");

        let token: String = login_user(&app, "booker@example.com").await;

        let response = send_json(app.clone(), "GET", "/me", Some(&token), None).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let profile: UserResponse = read_json(response).await;
        assert_eq!(profile.id, created.id);
        assert_eq!(profile.email, "booker@example.com");
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let app: Router = build_router(create_test_app_state());

        let created: UserResponse = register_user(&app, "Mixed.Case@Example.COM", "user").await;
        assert_eq!(created.email, "mixed.case@example.com");

        // Login works with any casing of the same address
        let token: String = login_user(&app, "MIXED.case@example.com").await;
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "booker@example.com", "user").await;

        let request: LoginRequest = LoginRequest {
            email: String::from("booker@example.com"),
            password: String::from("WrongPassword1!"),
        };
        let body: String = serde_json::to_string(&request).unwrap();
        let response = send_json(app.clone(), "POST", "/login", None, Some(body)).await;

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
        let error: ErrorResponse = read_json(response).await;
        assert!(error.error);
        assert_eq!(
            error.message,
            "Authentication failed: Incorrect username or password"
        );
    }

    #[tokio::test]
    async fn test_me_without_authorization_header_fails() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
        assert_eq!(read_text(response).await, "Missing Authorization header");
    }

    #[tokio::test]
    async fn test_me_with_malformed_authorization_header_fails() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header("Authorization", "Token abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
        assert_eq!(
            read_text(response).await,
            "Invalid Authorization header format. Expected: 'Bearer <token>'"
        );
    }

    #[tokio::test]
    async fn test_me_with_unknown_token_fails() {
        let app: Router = build_router(create_test_app_state());

        let response = send_json(app.clone(), "GET", "/me", Some("bogus-token"), None).await;

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
        assert!(
            read_text(response)
                .await
                .starts_with("Session validation failed")
        );
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "booker@example.com", "user").await;
        let token: String = login_user(&app, "booker@example.com").await;

        let response = send_json(app.clone(), "POST", "/logout", Some(&token), None).await;
        assert_eq!(response.status(), HttpStatusCode::NO_CONTENT);

        let response = send_json(app.clone(), "GET", "/me", Some(&token), None).await;
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_booking_lifecycle() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "admin@example.com", "admin").await;
        let admin_token: String = login_user(&app, "admin@example.com").await;
        let resource: ResourceResponse = create_resource(&app, &admin_token, "Main Hall").await;

        register_user(&app, "booker@example.com", "user").await;
        let token: String = login_user(&app, "booker@example.com").await;

        // Create
        let body: String = booking_body("Team Sync", resource.id, 1, 2);
        let response = send_json(app.clone(), "POST", "/bookings", Some(&token), Some(body)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let booking: BookingResponse = read_json(response).await;
        assert_eq!(booking.title, "Team Sync");
        assert_eq!(booking.resource_id, resource.id);

        // Read
        let uri: String = format!("/bookings/{}", booking.id);
        let response = send_json(app.clone(), "GET", &uri, Some(&token), None).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        // Update
        let update: UpdateBookingRequest = UpdateBookingRequest {
            title: String::from("Rescheduled Sync"),
            start: hours_from_now(4),
            end: hours_from_now(5),
            resource_id: resource.id,
        };
        let body: String = serde_json::to_string(&update).unwrap();
        let response = send_json(app.clone(), "PUT", &uri, Some(&token), Some(body)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let updated: BookingResponse = read_json(response).await;
        assert_eq!(updated.title, "Rescheduled Sync");

        // Delete
        let response = send_json(app.clone(), "DELETE", &uri, Some(&token), None).await;
        assert_eq!(response.status(), HttpStatusCode::NO_CONTENT);

        let response = send_json(app.clone(), "GET", &uri, Some(&token), None).await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_booking_conflict_returns_bad_request() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "admin@example.com", "admin").await;
        let admin_token: String = login_user(&app, "admin@example.com").await;
        let resource: ResourceResponse = create_resource(&app, &admin_token, "Main Hall").await;

        register_user(&app, "booker@example.com", "user").await;
        let token: String = login_user(&app, "booker@example.com").await;

        let body: String = booking_body("Team Sync", resource.id, 1, 2);
        let response = send_json(app.clone(), "POST", "/bookings", Some(&token), Some(body)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: String = booking_body("Standup", resource.id, 1, 2);
        let response = send_json(app.clone(), "POST", "/bookings", Some(&token), Some(body)).await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.message, "Resource is not available");
    }

    #[tokio::test]
    async fn test_booking_in_the_past_is_rejected() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "admin@example.com", "admin").await;
        let admin_token: String = login_user(&app, "admin@example.com").await;
        let resource: ResourceResponse = create_resource(&app, &admin_token, "Main Hall").await;

        let body: String = booking_body("Retro", resource.id, -2, -1);
        let response = send_json(
            app.clone(),
            "POST",
            "/bookings",
            Some(&admin_token),
            Some(body),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_foreign_booking_reads_as_not_found() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "admin@example.com", "admin").await;
        let admin_token: String = login_user(&app, "admin@example.com").await;
        let resource: ResourceResponse = create_resource(&app, &admin_token, "Main Hall").await;

        register_user(&app, "owner@example.com", "user").await;
        let owner_token: String = login_user(&app, "owner@example.com").await;
        register_user(&app, "other@example.com", "user").await;
        let other_token: String = login_user(&app, "other@example.com").await;

        let body: String = booking_body("Team Sync", resource.id, 1, 2);
        let response = send_json(
            app.clone(),
            "POST",
            "/bookings",
            Some(&owner_token),
            Some(body),
        )
        .await;
        let booking: BookingResponse = read_json(response).await;

        let uri: String = format!("/bookings/{}", booking.id);
        let response = send_json(app.clone(), "GET", &uri, Some(&other_token), None).await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(
            error.message,
            format!("Booking not found: Booking {} does not exist", booking.id)
        );

        let response = send_json(app.clone(), "DELETE", &uri, Some(&other_token), None).await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_resource_requires_admin() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "booker@example.com", "user").await;
        let token: String = login_user(&app, "booker@example.com").await;

        let request: CreateResourceRequest = CreateResourceRequest {
            name: String::from("Main Hall"),
            location: None,
            capacity: 10,
            room_type: String::from("meeting_room"),
        };
        let body: String = serde_json::to_string(&request).unwrap();
        let response = send_json(app.clone(), "POST", "/resources", Some(&token), Some(body)).await;

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(
            error.message,
            "Unauthorized: 'create_resource' requires at least the admin role"
        );
    }

    #[tokio::test]
    async fn test_list_all_bookings_requires_admin() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "admin@example.com", "admin").await;
        let admin_token: String = login_user(&app, "admin@example.com").await;
        let resource: ResourceResponse = create_resource(&app, &admin_token, "Main Hall").await;

        register_user(&app, "booker@example.com", "user").await;
        let token: String = login_user(&app, "booker@example.com").await;
        let body: String = booking_body("Team Sync", resource.id, 1, 2);
        send_json(app.clone(), "POST", "/bookings", Some(&token), Some(body)).await;

        let response = send_json(app.clone(), "GET", "/bookings/all", Some(&token), None).await;
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);

        let response =
            send_json(app.clone(), "GET", "/bookings/all", Some(&admin_token), None).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bookings: Vec<BookingResponse> = read_json(response).await;
        assert_eq!(bookings.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_resource_name_is_rejected() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "admin@example.com", "admin").await;
        let admin_token: String = login_user(&app, "admin@example.com").await;
        create_resource(&app, &admin_token, "Main Hall").await;

        let request: CreateResourceRequest = CreateResourceRequest {
            name: String::from("MAIN HALL"),
            location: None,
            capacity: 10,
            room_type: String::from("meeting_room"),
        };
        let body: String = serde_json::to_string(&request).unwrap();
        let response = send_json(
            app.clone(),
            "POST",
            "/resources",
            Some(&admin_token),
            Some(body),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(response).await;
        assert!(error.message.contains("already exists"));
    }

    #[tokio::test]
    async fn test_list_bookings_filters_by_title() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "admin@example.com", "admin").await;
        let admin_token: String = login_user(&app, "admin@example.com").await;
        let resource: ResourceResponse = create_resource(&app, &admin_token, "Main Hall").await;

        register_user(&app, "booker@example.com", "user").await;
        let token: String = login_user(&app, "booker@example.com").await;

        let body: String = booking_body("Team Sync", resource.id, 1, 2);
        send_json(app.clone(), "POST", "/bookings", Some(&token), Some(body)).await;
        let body: String = booking_body("Budget Review", resource.id, 3, 4);
        send_json(app.clone(), "POST", "/bookings", Some(&token), Some(body)).await;

        let response =
            send_json(app.clone(), "GET", "/bookings?title=sync", Some(&token), None).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bookings: Vec<BookingResponse> = read_json(response).await;
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].title, "Team Sync");
    }

    #[tokio::test]
    async fn test_list_users_supports_pagination() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "first@example.com", "user").await;
        register_user(&app, "second@example.com", "user").await;
        register_user(&app, "third@example.com", "user").await;
        let token: String = login_user(&app, "first@example.com").await;

        let response = send_json(
            app.clone(),
            "GET",
            "/users?offset=1&limit=1",
            Some(&token),
            None,
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let users: Vec<UserResponse> = read_json(response).await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "second@example.com");
    }

    #[tokio::test]
    async fn test_delete_user_cascades_sessions() {
        let app: Router = build_router(create_test_app_state());
        register_user(&app, "admin@example.com", "admin").await;
        let admin_token: String = login_user(&app, "admin@example.com").await;

        let victim: UserResponse = register_user(&app, "victim@example.com", "user").await;
        let victim_token: String = login_user(&app, "victim@example.com").await;

        let uri: String = format!("/users/{}", victim.id);
        let response = send_json(app.clone(), "DELETE", &uri, Some(&admin_token), None).await;
        assert_eq!(response.status(), HttpStatusCode::NO_CONTENT);

        // The deleted user's session no longer validates
        let response = send_json(app.clone(), "GET", "/me", Some(&victim_token), None).await;
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);

        let response = send_json(app.clone(), "GET", &uri, Some(&admin_token), None).await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user_requires_admin() {
        let app: Router = build_router(create_test_app_state());
        let first: UserResponse = register_user(&app, "first@example.com", "user").await;
        register_user(&app, "second@example.com", "user").await;
        let token: String = login_user(&app, "second@example.com").await;

        let uri: String = format!("/users/{}", first.id);
        let response = send_json(app.clone(), "DELETE", &uri, Some(&token), None).await;

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_rejected() {
        let app: Router = build_router(create_test_app_state());

        let response = send_json(
            app.clone(),
            "POST",
            "/users",
            None,
            Some(String::from("{not json")),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }
}
