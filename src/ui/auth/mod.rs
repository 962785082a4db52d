//! Session state
//!
//! This module provides the reactive session store shared by the gateway,
//! the route guard and the views.

mod context;

pub use context::{
    LOGIN_ENDPOINT, ME_ENDPOINT, REGISTER_ENDPOINT, SessionSnapshot, SessionStore,
    provide_session_context, use_session_context,
};
