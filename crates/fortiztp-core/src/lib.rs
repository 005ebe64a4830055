//! # fortiztp-core
//!
//! Shared plumbing for the FortiZTP Cloud SDK.
//!
//! This crate provides the transport, authentication, configuration and error
//! types consumed by the typed `fortiztp` client crate.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and the vendor error payload
//! - [`config`] - Connection configuration and documented defaults
//! - [`auth`] - OAuth 2.0 password-grant token acquisition and refresh
//! - [`client`] - HTTP transport, retry policy and statistics
//! - [`audit`] - Operation audit records and the sink trait
//! - [`query`] - Query parameter building helpers

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod audit;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod query;

// Re-export commonly used types
pub use error::{Error, ErrorPayload, Result};
