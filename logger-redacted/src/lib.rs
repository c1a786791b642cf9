//! Logging with automatic PII redaction for the appointments service
//!
//! Patient natural keys (SSNs) are sensitive: they may appear in full in an
//! HTTP error body returned to the caller, but never in log output. This crate
//! provides the pieces that keep them out of the logs:
//!
//! - [`MaskedSsn`] / [`mask_ssn`]: display a natural key with everything but the
//!   last four characters masked, for structured log fields
//! - [`redact_key`]: mask every occurrence of a known natural key inside free text
//! - [`PiiRedactor`]: pattern-based redaction for text whose content is not known
//!   in advance (database error messages, upstream error strings)
//! - [`init_tracing`]: installs the `tracing` subscriber (pretty or JSON)
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{mask_ssn, redact_key, MaskedSsn};
//!
//! assert_eq!(mask_ssn("123-45-6789"), "***-**-6789");
//! assert_eq!(MaskedSsn("123-45-6789").to_string(), "***-**-6789");
//! assert_eq!(
//!     redact_key("Patient with SSN '123-45-6789' not found", "123-45-6789"),
//!     "Patient with SSN '***-**-6789' not found"
//! );
//! ```

pub mod config;
pub mod masking;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use masking::*;
pub use redactor::*;
pub use subscriber::*;
