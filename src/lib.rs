//! DevDeck - session and authentication lifecycle
//!
//! A mock authentication backend (token service, user directory, HTTP API)
//! paired with the client pieces that consume it: token persistence, an
//! authenticated HTTP gateway, a reactive session store and a route guard.

pub mod core;
pub mod ui;
