//! In-memory conversation sessions

pub mod models;
pub mod store;

pub use models::{ChatMessage, Role, Session, SessionSummary};
pub use store::SessionStore;
