//! Request validation utilities for consistent validation across handlers
//!
//! Request types implement [`RequestValidation`]; violations are collected per
//! field in a [`FieldErrors`] so one response reports all of them. The first
//! violation also becomes the top-level error message.

use std::collections::HashMap;

use crate::error::ApiError;

/// Trait for validating request payloads
///
/// # Example
///
/// ```rust
/// use appointments_server::validation::{FieldErrors, RequestValidation};
/// use appointments_server::{validate_required, ApiError};
///
/// struct CreatePatient {
///     name: String,
/// }
///
/// impl RequestValidation for CreatePatient {
///     fn validate(&self) -> Result<(), ApiError> {
///         let mut errors = FieldErrors::new();
///         validate_required!(errors, "name", self.name, "Name must not be blank");
///         errors.into_result()
///     }
/// }
///
/// assert!(CreatePatient { name: " ".into() }.validate().is_err());
/// ```
pub trait RequestValidation {
    /// Validates the request and returns an error if validation fails
    fn validate(&self) -> Result<(), ApiError>;
}

/// Validation failures keyed by field path, in detection order
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, Vec<String>>,
    first: Option<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        if self.first.is_none() {
            self.first = Some(message.clone());
        }
        self.errors.entry(field.into()).or_default().push(message);
    }

    /// `Ok` when nothing was recorded, otherwise a validation error carrying every field
    pub fn into_result(self) -> Result<(), ApiError> {
        match self.first {
            None => Ok(()),
            Some(message) => Err(ApiError::validation_with_fields(message, self.errors)),
        }
    }
}

/// Macro for validating fields with custom predicates
///
/// ```rust,ignore
/// validate_field!(errors, "appointmentDetails", !self.details.is_empty(), "Appointment details list must not be empty");
/// ```
#[macro_export]
macro_rules! validate_field {
    ($errors:expr, $field_name:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            $errors.add($field_name, $message);
        }
    };
}

/// Macro for validating required fields (non-blank strings)
///
/// ```rust,ignore
/// validate_required!(errors, "ssn", self.ssn, "SSN must not be blank");
/// ```
#[macro_export]
macro_rules! validate_required {
    ($errors:expr, $field_name:expr, $field:expr, $message:expr) => {
        $crate::validate_field!($errors, $field_name, !$field.trim().is_empty(), $message);
    };
}

/// Trimmed value of a required query parameter; absent or blank is a validation error
pub fn required_param(value: Option<&str>, field: &str, message: &str) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(ApiError::validation_with_fields(
            message,
            HashMap::from([(field.to_string(), vec![message.to_string()])]),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    struct Named {
        name: String,
        tags: Vec<String>,
    }

    impl RequestValidation for Named {
        fn validate(&self) -> Result<(), ApiError> {
            let mut errors = FieldErrors::new();
            validate_required!(errors, "name", self.name, "Name must not be blank");
            validate_field!(errors, "tags", !self.tags.is_empty(), "Tags must not be empty");
            errors.into_result()
        }
    }

    #[test]
    fn test_validation_success() {
        let named = Named {
            name: "John".into(),
            tags: vec!["a".into()],
        };
        assert!(named.validate().is_ok());
    }

    #[test]
    fn test_all_violations_are_reported() {
        let named = Named {
            name: "  ".into(),
            tags: vec![],
        };
        match named.validate() {
            Err(ApiError::Validation { message, field_errors }) => {
                assert_eq!(message, "Name must not be blank");
                let field_errors = field_errors.unwrap();
                assert_eq!(field_errors.len(), 2);
                assert_eq!(field_errors.get("tags").unwrap(), &vec!["Tags must not be empty".to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_required_param_trims() {
        assert_eq!(
            required_param(Some("  123-45-6789 "), "ssn", "SSN must not be blank").unwrap(),
            "123-45-6789"
        );
    }

    #[test]
    fn test_required_param_rejects_blank_and_missing() {
        for value in [None, Some(""), Some("   ")] {
            let err = required_param(value, "ssn", "SSN must not be blank").unwrap_err();
            assert_eq!(err.public_message(), "SSN must not be blank");
        }
    }
}
