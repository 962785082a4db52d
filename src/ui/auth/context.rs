//! Session store: process-wide authentication state
//!
//! This module provides a reactive session context that:
//! - Holds the current token, user, loading flag and last error
//! - Handles login, logout, registration and user hydration
//! - Persists the token through an injected [`TokenStore`]
//! - Tears the session down whenever the gateway sees a 401
//!
//! Overlapping calls are sequenced: a response that arrives after a newer
//! login, logout or user fetch has started is discarded.

use leptos::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::models::{Credentials, LoginResponse, RegisterData, User};
use crate::ui::auth_utils::{TokenSource, TokenStore};
use crate::ui::config::ClientConfig;
use crate::ui::http::{ApiError, HttpGateway, HttpTransport, RequestOptions};
use crate::ui::navigation::Navigator;
use crate::ui::notifications::Notifier;
use crate::ui::router::guard::safe_redirect;
use crate::ui::router::routes::{HOME_PATH, LOGIN_PATH};

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const ME_ENDPOINT: &str = "/api/auth/me";
pub const REGISTER_ENDPOINT: &str = "/api/auth/register";

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";
pub const LOGOUT_MESSAGE: &str = "Logged out";
pub const REGISTER_SUCCESS_MESSAGE: &str = "Registration successful, please log in";

/// Plain copy of the session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionSnapshot {
    /// A token is present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The loaded user holds the admin role (false until a user is loaded)
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

/// Position of a call in the session's request order
#[derive(Debug, Clone, Copy)]
struct Ticket {
    epoch: u64,
    fetch: u64,
}

/// Counters used to detect stale responses
#[derive(Debug, Default)]
struct Sequencer {
    /// Bumped when the session identity changes (login started, logout)
    epoch: AtomicU64,
    /// Bumped when a user fetch starts
    fetch: AtomicU64,
}

impl Sequencer {
    fn current(&self) -> Ticket {
        Ticket {
            epoch: self.epoch.load(Ordering::SeqCst),
            fetch: self.fetch.load(Ordering::SeqCst),
        }
    }

    fn next_epoch(&self) -> Ticket {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.current()
    }

    fn next_fetch(&self) -> Ticket {
        self.fetch.fetch_add(1, Ordering::SeqCst);
        self.current()
    }

    fn epoch_is_current(&self, ticket: Ticket) -> bool {
        self.epoch.load(Ordering::SeqCst) == ticket.epoch
    }

    fn fetch_is_current(&self, ticket: Ticket) -> bool {
        self.epoch_is_current(ticket) && self.fetch.load(Ordering::SeqCst) == ticket.fetch
    }
}

/// Session store handle; clones share the same state
pub struct SessionStore<T> {
    gateway: Arc<HttpGateway<T>>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    sequencer: Arc<Sequencer>,
    /// Current session token
    pub token: ArcRwSignal<Option<String>>,
    /// Current user, once loaded
    pub user: ArcRwSignal<Option<User>>,
    /// An auth operation is in flight
    pub loading: ArcRwSignal<bool>,
    /// Error message from last operation
    pub error: ArcRwSignal<Option<String>>,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tokens: self.tokens.clone(),
            notifier: self.notifier.clone(),
            navigator: self.navigator.clone(),
            sequencer: self.sequencer.clone(),
            token: self.token.clone(),
            user: self.user.clone(),
            loading: self.loading.clone(),
            error: self.error.clone(),
        }
    }
}

impl<T: HttpTransport> SessionStore<T> {
    /// Create the store, reading any persisted token.
    ///
    /// Call [`SessionStore::init`] before rendering protected views so the
    /// user behind a persisted token is loaded.
    pub fn new<S>(
        config: ClientConfig,
        transport: T,
        tokens: Arc<S>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self
    where
        S: TokenStore + 'static,
    {
        let token = ArcRwSignal::new(tokens.load());
        let user = ArcRwSignal::new(None::<User>);

        let on_unauthorized = {
            let token = token.clone();
            let user = user.clone();
            Arc::new(move || {
                token.set(None);
                user.set(None);
            })
        };

        let source: Arc<dyn TokenSource> = tokens.clone();
        let gateway = HttpGateway::new(
            config,
            transport,
            source,
            notifier.clone(),
            navigator.clone(),
        )
        .on_unauthorized(on_unauthorized);

        Self {
            gateway: Arc::new(gateway),
            tokens,
            notifier,
            navigator,
            sequencer: Arc::new(Sequencer::default()),
            token,
            user,
            loading: ArcRwSignal::new(false),
            error: ArcRwSignal::new(None),
        }
    }

    /// Gateway for other API calls; it shares this session's token and 401 handling
    pub fn gateway(&self) -> &HttpGateway<T> {
        &self.gateway
    }

    /// Hydrate the user behind a persisted token.
    ///
    /// A failure downgrades the session to logged out without surfacing an error.
    pub async fn init(&self) {
        if self.token.with_untracked(Option::is_none) {
            return;
        }

        if let Err(e) = self.load_user(RequestOptions::default().silent()).await {
            leptos::logging::log!("Persisted session rejected: {}", e);
            self.error.set(None);
        }
    }

    /// Current state as a plain value
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            token: self.token.get_untracked(),
            user: self.user.get_untracked(),
            loading: self.loading.get_untracked(),
            error: self.error.get_untracked(),
        }
    }

    /// Check if a token is present (tracked)
    pub fn is_authenticated(&self) -> bool {
        self.token.with(Option::is_some)
    }

    /// Check if the loaded user is an admin (tracked)
    pub fn is_admin(&self) -> bool {
        self.user.with(|user| user.as_ref().is_some_and(User::is_admin))
    }

    /// Clear error message
    pub fn clear_error(&self) {
        self.error.set(None);
    }

    /// Log in and go to the home view
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.login_with_redirect(credentials, None).await
    }

    /// Log in and go to `redirect` when it is a same-origin path, home otherwise
    pub async fn login_with_redirect(
        &self,
        credentials: &Credentials,
        redirect: Option<&str>,
    ) -> Result<User, ApiError> {
        let ticket = self.sequencer.next_epoch();
        self.loading.set(true);
        self.error.set(None);

        let result: Result<LoginResponse, ApiError> = self
            .gateway
            .post(
                LOGIN_ENDPOINT,
                Some(credentials),
                RequestOptions::default().skip_auth(),
            )
            .await;

        if !self.sequencer.epoch_is_current(ticket) {
            leptos::logging::log!("Discarding stale login response");
            return result.map(|response| response.user);
        }

        let outcome = match result {
            Ok(LoginResponse { user, token }) => {
                if let Err(e) = self.tokens.save(&token) {
                    leptos::logging::warn!("Session will not survive a reload: {}", e);
                }
                self.token.set(Some(token));
                self.user.set(Some(user.clone()));

                self.notifier.success(LOGIN_SUCCESS_MESSAGE);
                let target = redirect.and_then(safe_redirect).unwrap_or(HOME_PATH);
                self.navigator.navigate(target);
                Ok(user)
            }
            Err(e) => {
                // Already surfaced by the gateway
                self.error.set(Some(e.to_string()));
                Err(e)
            }
        };

        self.loading.set(false);
        outcome
    }

    /// Drop the session locally. Cannot fail.
    pub fn logout(&self) {
        self.sequencer.next_epoch();
        self.clear_session();
        self.loading.set(false);
        self.navigator.navigate(LOGIN_PATH);
        self.notifier.success(LOGOUT_MESSAGE);
    }

    /// Load the user for the current token; any failure ends the session
    pub async fn fetch_user_info(&self) -> Result<(), ApiError> {
        self.load_user(RequestOptions::default()).await
    }

    async fn load_user(&self, options: RequestOptions) -> Result<(), ApiError> {
        if self.token.with_untracked(Option::is_none) {
            return Ok(());
        }

        let ticket = self.sequencer.next_fetch();
        self.loading.set(true);

        let result: Result<User, ApiError> =
            self.gateway.get(ME_ENDPOINT, options).await;

        if !self.sequencer.fetch_is_current(ticket) {
            leptos::logging::log!("Discarding stale user info response");
            return result.map(|_| ());
        }

        let outcome = match result {
            Ok(user) => {
                self.user.set(Some(user));
                Ok(())
            }
            Err(e) => {
                self.error.set(Some(e.to_string()));
                self.clear_session();
                Err(e)
            }
        };

        self.loading.set(false);
        outcome
    }

    /// Create an account. Errors are returned so the form can stay open.
    pub async fn register(&self, data: &RegisterData) -> Result<bool, ApiError> {
        self.loading.set(true);
        self.error.set(None);

        let result: Result<serde_json::Value, ApiError> = self
            .gateway
            .post(
                REGISTER_ENDPOINT,
                Some(data),
                RequestOptions::default().skip_auth(),
            )
            .await;

        let outcome = match result {
            Ok(_) => {
                self.notifier.success(REGISTER_SUCCESS_MESSAGE);
                Ok(true)
            }
            Err(e) => {
                self.error.set(Some(e.to_string()));
                Err(e)
            }
        };

        self.loading.set(false);
        outcome
    }

    fn clear_session(&self) {
        self.token.set(None);
        self.user.set(None);
        self.tokens.clear();
    }
}

/// Provide the session store to the component tree
pub fn provide_session_context<T>(store: SessionStore<T>) -> SessionStore<T>
where
    T: Send + Sync + 'static,
{
    provide_context(store.clone());
    store
}

/// Get the session store from the component tree
pub fn use_session_context<T>() -> SessionStore<T>
where
    T: Send + Sync + 'static,
{
    expect_context::<SessionStore<T>>()
}
