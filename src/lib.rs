pub mod api;
pub mod config;
pub mod database;
pub mod errors;
pub mod knowledge;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;

pub use config::AppConfig;
pub use errors::*;
