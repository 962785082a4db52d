//! Authentication service
//!
//! Issues and validates session tokens against the in-memory user directory,
//! and registers new accounts.

use crate::core::auth::jwt::{Claims, JwtError, JwtService};
use crate::core::auth::users::{UserDirectory, UserDirectoryError};
use crate::core::models::{Credentials, LoginResponse, ROLE_USER, RegisterData, User};

/// Minimum accepted password length for new accounts
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("No authentication token provided")]
    MissingToken,

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Username already taken")]
    UsernameAlreadyExists,

    #[error("Password too short (minimum 8 characters)")]
    PasswordTooShort,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username format")]
    InvalidUsername,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<UserDirectoryError> for AuthError {
    fn from(err: UserDirectoryError) -> Self {
        match err {
            UserDirectoryError::NotFound => AuthError::UserNotFound,
            UserDirectoryError::EmailAlreadyExists => AuthError::EmailAlreadyExists,
            UserDirectoryError::UsernameAlreadyExists => AuthError::UsernameAlreadyExists,
            UserDirectoryError::HashingError(e) => AuthError::InternalError(e),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::TokenExpired,
            JwtError::InvalidToken => AuthError::InvalidToken,
            JwtError::EncodingError(e) => AuthError::InternalError(e),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: UserDirectory,
    jwt_service: JwtService,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(users: UserDirectory, jwt_service: JwtService) -> Self {
        Self { users, jwt_service }
    }

    /// Access the underlying user directory
    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// Validate email format
    fn validate_email(email: &str) -> Result<(), AuthError> {
        let (local, domain) = email.split_once('@').ok_or(AuthError::InvalidEmail)?;

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(AuthError::InvalidEmail);
        }

        if !domain.contains('.') || domain.split('.').any(|p| p.is_empty()) {
            return Err(AuthError::InvalidEmail);
        }

        Ok(())
    }

    /// Validate username format
    fn validate_username(username: &str) -> Result<(), AuthError> {
        // Username must be 3-50 characters
        let length = username.chars().count();
        if !(3..=50).contains(&length) {
            return Err(AuthError::InvalidUsername);
        }

        // Username must start with a letter
        if !username
            .chars()
            .next()
            .map(|c| c.is_alphabetic())
            .unwrap_or(false)
        {
            return Err(AuthError::InvalidUsername);
        }

        // Username can only contain letters, numbers, underscores, and hyphens
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(AuthError::InvalidUsername);
        }

        Ok(())
    }

    fn validate_password(password: &str) -> Result<(), AuthError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort);
        }
        Ok(())
    }

    /// Check credentials and sign a session token
    pub fn issue_token(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let record = self
            .users
            .find_by_username(&credentials.username)
            .ok_or(AuthError::InvalidCredentials)?;

        if !UserDirectory::verify_password(&credentials.password, &record.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (token, _) =
            self.jwt_service
                .generate_token(record.id, &record.username, &record.roles)?;

        Ok(LoginResponse {
            user: record.to_user(),
            token,
        })
    }

    /// Verify signature and expiry of a session token
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(self.jwt_service.validate_token(token)?)
    }

    /// Look up the user a validated token belongs to
    pub fn current_user(&self, claims: &Claims) -> Result<User, AuthError> {
        self.users
            .find_by_id(claims.id)
            .map(|record| record.to_user())
            .ok_or(AuthError::UserNotFound)
    }

    /// Register a new account with the default role
    pub fn register(&self, data: &RegisterData) -> Result<User, AuthError> {
        Self::validate_username(&data.username)?;
        Self::validate_email(&data.email)?;
        Self::validate_password(&data.password)?;

        let user = self.users.create(
            &data.username,
            &data.email,
            &data.password,
            vec![ROLE_USER.to_string()],
        )?;

        Ok(user)
    }
}
