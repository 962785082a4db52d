//! In-memory user directory for the mock backend
//!
//! Passwords are kept as bcrypt hashes. Nothing here survives a restart.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::models::{ROLE_ADMIN, ROLE_USER, User};

/// Minimum bcrypt cost; this directory only backs local development
const BCRYPT_COST: u32 = 4;

/// Password shared by the seeded accounts
pub const SEED_PASSWORD: &str = "password123";

/// User directory error types
#[derive(Debug, thiserror::Error)]
pub enum UserDirectoryError {
    #[error("User not found")]
    NotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Password hashing failed: {0}")]
    HashingError(String),
}

/// Stored user row, including the password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

impl UserRecord {
    /// Public view of the record, without the password hash
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Concurrent user store keyed by username
#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<DashMap<String, UserRecord>>,
    next_id: Arc<AtomicU64>,
}

impl UserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Create a directory holding the two development accounts
    pub fn seeded() -> Result<Self, UserDirectoryError> {
        let directory = Self::new();
        directory.create(
            "admin",
            "admin@example.com",
            SEED_PASSWORD,
            vec![ROLE_USER.to_string(), ROLE_ADMIN.to_string()],
        )?;
        directory.create(
            "user",
            "user@example.com",
            SEED_PASSWORD,
            vec![ROLE_USER.to_string()],
        )?;
        Ok(directory)
    }

    /// Hash a password using bcrypt with automatic salt generation
    pub fn hash_password(password: &str) -> Result<String, UserDirectoryError> {
        bcrypt::hash(password, BCRYPT_COST)
            .map_err(|e| UserDirectoryError::HashingError(e.to_string()))
    }

    /// Verify a password against a bcrypt hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, UserDirectoryError> {
        bcrypt::verify(password, hash).map_err(|e| UserDirectoryError::HashingError(e.to_string()))
    }

    /// Create a new user with a plain text password (will be hashed)
    pub fn create(
        &self,
        username: &str,
        email: &str,
        password: &str,
        roles: Vec<String>,
    ) -> Result<User, UserDirectoryError> {
        if self
            .users
            .iter()
            .any(|entry| entry.email.eq_ignore_ascii_case(email))
        {
            return Err(UserDirectoryError::EmailAlreadyExists);
        }

        let password_hash = Self::hash_password(password)?;

        match self.users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(UserDirectoryError::UsernameAlreadyExists),
            Entry::Vacant(slot) => {
                let record = UserRecord {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    username: username.to_string(),
                    email: email.to_string(),
                    password_hash,
                    roles,
                };
                let user = record.to_user();
                slot.insert(record);
                Ok(user)
            }
        }
    }

    /// Find a user row by username
    pub fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        self.users.get(username).map(|entry| entry.value().clone())
    }

    /// Find a user row by ID
    pub fn find_by_id(&self, id: u64) -> Option<UserRecord> {
        self.users
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.value().clone())
    }

    /// Remove a user by username
    pub fn remove(&self, username: &str) -> Result<(), UserDirectoryError> {
        self.users
            .remove(username)
            .map(|_| ())
            .ok_or(UserDirectoryError::NotFound)
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_directory() {
        let directory = UserDirectory::seeded().unwrap();
        assert_eq!(directory.len(), 2);

        let admin = directory.find_by_username("admin").unwrap();
        assert_eq!(admin.id, 1);
        assert_eq!(admin.roles, vec!["USER", "ADMIN"]);

        let user = directory.find_by_username("user").unwrap();
        assert_eq!(user.id, 2);
        assert_eq!(user.roles, vec!["USER"]);
    }

    #[test]
    fn test_passwords_are_hashed() {
        let directory = UserDirectory::seeded().unwrap();
        let admin = directory.find_by_username("admin").unwrap();

        assert_ne!(admin.password_hash, SEED_PASSWORD);
        assert!(UserDirectory::verify_password(SEED_PASSWORD, &admin.password_hash).unwrap());
        assert!(!UserDirectory::verify_password("wrongpass", &admin.password_hash).unwrap());
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let directory = UserDirectory::new();
        let first = directory
            .create("alice", "alice@example.com", "password1", vec![])
            .unwrap();
        let second = directory
            .create("bob", "bob@example.com", "password2", vec![])
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_create_rejects_duplicate_username() {
        let directory = UserDirectory::seeded().unwrap();
        let result = directory.create("admin", "other@example.com", "password1", vec![]);
        assert!(matches!(
            result,
            Err(UserDirectoryError::UsernameAlreadyExists)
        ));
    }

    #[test]
    fn test_create_rejects_duplicate_email() {
        let directory = UserDirectory::seeded().unwrap();
        let result = directory.create("someone", "ADMIN@example.com", "password1", vec![]);
        assert!(matches!(result, Err(UserDirectoryError::EmailAlreadyExists)));
    }

    #[test]
    fn test_find_by_id() {
        let directory = UserDirectory::seeded().unwrap();
        assert_eq!(directory.find_by_id(2).unwrap().username, "user");
        assert!(directory.find_by_id(99).is_none());
    }

    #[test]
    fn test_remove() {
        let directory = UserDirectory::seeded().unwrap();
        directory.remove("user").unwrap();
        assert!(directory.find_by_username("user").is_none());
        assert!(matches!(
            directory.remove("user"),
            Err(UserDirectoryError::NotFound)
        ));
    }

    #[test]
    fn test_to_user_drops_hash() {
        let directory = UserDirectory::seeded().unwrap();
        let user = directory.find_by_username("admin").unwrap().to_user();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("$2"));
    }
}
