//! Assembly of the mock backend router

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::core::auth::{
    AuthApiState, AuthService, JwtConfig, JwtService, UserDirectory, UserDirectoryError,
    auth_api_router,
};
use crate::core::config::Config;

/// Build the auth service described by `config`, seeded with the development users
pub fn build_auth_service(config: &Config) -> Result<AuthService, UserDirectoryError> {
    let jwt_config =
        JwtConfig::new(config.jwt_secret_or_default()).expiration(config.jwt_expiration_minutes);

    Ok(AuthService::new(
        UserDirectory::seeded()?,
        JwtService::new(jwt_config),
    ))
}

/// Build the full application router around an auth service
pub fn app_router(auth_service: AuthService) -> Router {
    auth_api_router(AuthApiState { auth_service })
        // The dev front end is served from another origin
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}
