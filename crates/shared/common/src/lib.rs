//! Common utilities shared by the publisher and the subscriber service.
//!
//! This crate provides:
//! - Unified error handling for the HTTP API
//! - Configuration structures for the broker and the database

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
