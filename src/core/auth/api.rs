//! Auth API endpoints
//!
//! Provides the REST surface of the mock backend:
//! - POST /api/auth/login - Login and get a session token
//! - POST /api/auth/register - Register a new user
//! - GET /api/auth/me - Get current user info
//! - GET /api/protected - Sample endpoint behind the bearer check

use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::auth::{AuthError, AuthService, Claims};
use crate::core::models::{Credentials, ErrorBody, LoginResponse, RegisterData, User};

/// Auth API state containing the auth service
#[derive(Clone)]
pub struct AuthApiState {
    pub auth_service: AuthService,
}

/// Convert AuthError to API response
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            AuthError::InvalidToken => (StatusCode::FORBIDDEN, "INVALID_TOKEN"),
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            AuthError::EmailAlreadyExists => (StatusCode::CONFLICT, "EMAIL_EXISTS"),
            AuthError::UsernameAlreadyExists => (StatusCode::CONFLICT, "USERNAME_EXISTS"),
            AuthError::PasswordTooShort => (StatusCode::BAD_REQUEST, "PASSWORD_TOO_SHORT"),
            AuthError::InvalidEmail => (StatusCode::BAD_REQUEST, "INVALID_EMAIL"),
            AuthError::InvalidUsername => (StatusCode::BAD_REQUEST, "INVALID_USERNAME"),
            AuthError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorBody {
            message: self.to_string(),
            code: Some(code.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

/// Response for the sample protected endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: Claims,
}

/// Claims of a request that carried a valid bearer token
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl FromRequestParts<Arc<AuthApiState>> for Authenticated {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AuthApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        let claims = state.auth_service.validate_token(&token).inspect_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
        })?;

        Ok(Authenticated(claims))
    }
}

/// Create the auth API router
pub fn auth_api_router(state: AuthApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/me", get(me_handler))
        .route("/api/protected", get(protected_handler))
        .with_state(state)
}

/// POST /api/auth/login
/// Login and get a session token
async fn login_handler(
    State(state): State<Arc<AuthApiState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginResponse>, AuthError> {
    tracing::info!("Login attempt for user: {}", credentials.username);

    let response = state
        .auth_service
        .issue_token(&credentials)
        .inspect_err(|e| tracing::warn!("Login failed for {}: {}", credentials.username, e))?;

    tracing::info!("User logged in successfully: {}", response.user.username);

    Ok(Json(response))
}

/// POST /api/auth/register
/// Register a new user
async fn register_handler(
    State(state): State<Arc<AuthApiState>>,
    Json(data): Json<RegisterData>,
) -> Result<(StatusCode, Json<User>), AuthError> {
    tracing::info!("Registration attempt for user: {}", data.username);

    let user = state.auth_service.register(&data)?;

    tracing::info!("User registered successfully: {}", user.username);

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/auth/me
/// Get current user info from the bearer token
async fn me_handler(
    State(state): State<Arc<AuthApiState>>,
    Authenticated(claims): Authenticated,
) -> Result<Json<User>, AuthError> {
    let user = state.auth_service.current_user(&claims)?;

    Ok(Json(user))
}

/// GET /api/protected
async fn protected_handler(Authenticated(claims): Authenticated) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "This is protected data".to_string(),
        user: claims,
    })
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token.to_string())
}
