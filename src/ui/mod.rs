//! Client side of DevDeck: persistence, HTTP gateway, session store and routing

pub mod auth;
pub mod auth_utils;
pub mod config;
pub mod http;
pub mod navigation;
pub mod notifications;
pub mod router;

#[cfg(feature = "hydrate")]
pub mod browser;

pub use auth::{SessionSnapshot, SessionStore};
pub use http::{ApiError, HttpGateway};
pub use notifications::{NotificationManager, NotificationType};
pub use router::{NavigationDecision, RouteGuard};
