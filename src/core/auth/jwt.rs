//! JWT utilities for session token generation and validation
//!
//! Tokens are signed with HS256 and expire one hour after issuance by default.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Default session token lifetime (1 hour)
pub const TOKEN_EXPIRATION_MINUTES: i64 = 60;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
}

impl JwtConfig {
    /// Create a new JWT configuration with the default lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: TOKEN_EXPIRATION_MINUTES,
        }
    }

    /// Set token lifetime
    pub fn expiration(mut self, minutes: i64) -> Self {
        self.expiration_minutes = minutes;
        self
    }
}

/// JWT errors
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingError(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    InvalidToken,
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            // Bad signatures, broken base64, unparsable claims: all the same to callers
            _ => JwtError::InvalidToken,
        }
    }
}

/// Claims embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub id: u64,
    pub username: String,
    pub roles: Vec<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Sign a session token for the given subject
    pub fn generate_token(
        &self,
        id: u64,
        username: &str,
        roles: &[String],
    ) -> Result<(String, i64), JwtError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            id,
            username: username.to_string(),
            roles: roles.to_vec(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, exp.timestamp()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Strict expiration checking
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Token lifetime in minutes
    pub fn expiration_minutes(&self) -> i64 {
        self.config.expiration_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig::new("test_secret_key_for_testing_only_32bytes!"))
    }

    fn roles() -> Vec<String> {
        vec!["USER".to_string(), "ADMIN".to_string()]
    }

    /// Replace one character in the middle of the payload segment
    fn tamper_payload(token: &str) -> String {
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let payload = &mut parts[1];
        let mid = payload.len() / 2;
        let original = payload.as_bytes()[mid] as char;
        let replacement = if original == 'A' { "B" } else { "A" };
        payload.replace_range(mid..mid + 1, replacement);
        parts.join(".")
    }

    #[test]
    fn test_jwt_config_defaults_to_one_hour() {
        let config = JwtConfig::new("my_secret");

        assert_eq!(config.secret, "my_secret");
        assert_eq!(config.expiration_minutes, 60);
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("secret").expiration(5);
        assert_eq!(config.expiration_minutes, 5);
    }

    #[test]
    fn test_generate_token() {
        let service = create_test_service();

        let (token, exp) = service.generate_token(1, "admin", &roles()).unwrap();

        assert!(!token.is_empty());
        assert_eq!(token.split('.').count(), 3);
        let expected = Utc::now().timestamp() + 60 * 60;
        assert!((exp - expected).abs() <= 2);
    }

    #[test]
    fn test_validate_token_roundtrip_claims() {
        let service = create_test_service();

        let (token, exp) = service.generate_token(7, "admin", &roles()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.id, 7);
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.roles, roles());
        assert_eq!(claims.exp, exp);
        assert!(claims.iat <= claims.exp);
    }

    #[test]
    fn test_validate_invalid_token() {
        let service = create_test_service();

        let result = service.validate_token("invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_validate_garbage_token() {
        let service = create_test_service();

        assert!(matches!(
            service.validate_token(""),
            Err(JwtError::InvalidToken)
        ));
        assert!(matches!(
            service.validate_token("not-a-jwt"),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_validate_token_wrong_secret() {
        let service1 = JwtService::new(JwtConfig::new("secret_one"));
        let service2 = JwtService::new(JwtConfig::new("secret_two"));

        let (token, _) = service1.generate_token(1, "admin", &roles()).unwrap();

        let result = service2.validate_token(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = create_test_service();
        let (token, _) = service.generate_token(2, "user", &["USER".to_string()]).unwrap();

        let tampered = tamper_payload(&token);
        assert_ne!(tampered, token);

        let result = service.validate_token(&tampered);
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let service = create_test_service();
        let (token, _) = service.generate_token(2, "user", &["USER".to_string()]).unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        let forged = format!("{}.{}", head, signature.chars().rev().collect::<String>());
        if forged != token {
            assert!(service.validate_token(&forged).is_err());
        }
    }

    #[test]
    fn test_expired_token() {
        // Negative lifetime puts the expiry in the past
        let service = JwtService::new(JwtConfig::new("test_secret").expiration(-1));

        let (token, _) = service.generate_token(1, "admin", &roles()).unwrap();

        let result = service.validate_token(&token);
        assert!(
            matches!(result, Err(JwtError::Expired)),
            "Expected Expired error, got: {:?}",
            result
        );
    }

    #[test]
    fn test_jwt_error_display() {
        assert_eq!(format!("{}", JwtError::Expired), "Token expired");
        assert_eq!(format!("{}", JwtError::InvalidToken), "Invalid token");
    }
}
