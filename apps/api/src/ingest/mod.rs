//! Shared ingestion pipeline for model-generated career records.

pub mod fallback;
pub mod fields;
pub mod identity;
pub mod kind;
pub mod pipeline;
pub mod reconcile;
pub mod sanitize;
pub mod score;
pub mod validate;
