//! Upstream model integration: history trimming, response normalization,
//! and the endpoint-fallback call adapter

pub mod client;
pub mod normalize;
pub mod trim;

pub use client::ModelClient;
pub use normalize::extract_text;
pub use trim::{trim_messages, TrimLimits};
