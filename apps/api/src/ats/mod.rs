pub mod handlers;
pub mod prompts;
pub mod record;
pub mod service;
