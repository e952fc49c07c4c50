pub mod api;
pub mod client;
pub mod config;
pub mod llm_providers;
pub mod models;
pub mod prompts;
pub mod session;
pub mod store;
