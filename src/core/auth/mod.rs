//! Authentication module for the DevDeck mock backend
//!
//! This module provides:
//! - JWT session token generation and validation
//! - An in-memory user directory with bcrypt-hashed passwords
//! - REST API endpoints for login, registration and the current user

pub mod api;
pub mod jwt;
pub mod service;
pub mod users;

pub use api::{AuthApiState, Authenticated, auth_api_router};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use service::{AuthError, AuthService};
pub use users::{UserDirectory, UserDirectoryError, UserRecord};
