//! Domain models shared by both halves, plus the mock backend

pub mod models;

#[cfg(feature = "ssr")]
pub mod auth;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod server;

pub use models::*;
