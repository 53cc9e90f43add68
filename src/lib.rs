//! model-relay: a thin HTTP relay between browser chat clients and a
//! locally hosted text-generation server.
//!
//! The relay keeps short-lived in-memory conversation sessions, bounds the
//! history it forwards upstream, and normalizes whatever response shape the
//! model server happens to speak.

pub mod api;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod metrics;
pub mod model;
pub mod session;
