//! Common error handling utilities for the appointments service
//!
//! This crate provides the process-level error type used by the server binary
//! and the stable error codes that appear in API error bodies. Request-level
//! errors live next to the HTTP layer; this crate only carries what every
//! crate in the workspace agrees on.
//!
//! # Error Categories
//!
//! - **Validation**: malformed or missing input
//! - **Authentication / Authorization**: missing token, missing role
//! - **Not found**: unknown patient or no appointments for a patient
//! - **Conflict**: concurrent creation of the same patient
//! - **Database**: connection and query failures
//!
//! # Example
//!
//! ```rust
//! use error_common::{AppError, Result, codes};
//!
//! fn parse_port(raw: &str) -> Result<u16> {
//!     raw.parse()
//!         .map_err(|_| AppError::ConfigError(format!("invalid port '{}'", raw)))
//! }
//!
//! assert!(parse_port("8080").is_ok());
//! assert!(parse_port("http").is_err());
//! assert_eq!(codes::not_found::PATIENT_NOT_FOUND, "NOT_FOUND_5001");
//! ```

pub mod codes;
pub mod types;

pub use types::*;
