//! # databench-core
//!
//! Core types and utilities for the Databench self-service console.
//!
//! This crate provides the foundational pieces shared by the console crates:
//! error handling, HTTP client utilities, and configuration.
//!
//! ## Modules
//!
//! - [`error`] - Error types with stable error codes
//! - [`types`] - Backend service enumeration
//! - [`config`] - Configuration structures for console clients
//! - [`client`] - HTTP client utilities and retry logic

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
