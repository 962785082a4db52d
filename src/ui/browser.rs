//! Browser wiring
//!
//! Binds the session store and route guard to `localStorage`, `fetch`,
//! `window.location` and `document.title`.

use std::sync::Arc;

use crate::ui::auth::{SessionStore, provide_session_context};
use crate::ui::auth_utils::LocalStorageTokenStore;
use crate::ui::config::ClientConfig;
use crate::ui::http::transport::FetchTransport;
use crate::ui::navigation::{BrowserDocumentTitle, LocationNavigator};
use crate::ui::notifications::NotificationManager;
use crate::ui::router::{RouteGuard, RouteTable};

pub type BrowserSession = SessionStore<FetchTransport>;

/// Session store and guard for the running page
pub struct BrowserApp {
    pub session: BrowserSession,
    pub guard: RouteGuard<FetchTransport>,
    pub notifications: NotificationManager,
}

/// Build the browser session, provide it as context and hydrate the user.
///
/// Await this before rendering protected views.
pub async fn start(notifications: NotificationManager) -> BrowserApp {
    let session = SessionStore::new(
        ClientConfig::from_env(),
        FetchTransport,
        Arc::new(LocalStorageTokenStore),
        Arc::new(notifications.clone()),
        Arc::new(LocationNavigator),
    );
    let session = provide_session_context(session);

    session.init().await;

    let guard = RouteGuard::new(
        session.clone(),
        RouteTable::default(),
        Arc::new(BrowserDocumentTitle),
    );

    BrowserApp {
        session,
        guard,
        notifications,
    }
}
