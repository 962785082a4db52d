//! Client routing: static route metadata and the navigation guard

pub mod guard;
pub mod routes;

pub use guard::{AuthStatus, NavigationDecision, RouteGuard, evaluate, redirect_target};
pub use routes::{RouteMeta, RouteTable};
