//! # maturity
//!
//! Server and CLI around the `maturity-core` gap-analysis engine.
//!
//! The library target exposes the HTTP router, CLI and configuration so that
//! the binary and the integration tests share one implementation.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::AppError;
