//! # Forms
//!
//! Each form is a plain struct deserialized from the request body plus a
//! free `validate` function that turns it into validated data or a set of
//! field errors:
//!
//! ```text
//! validate(&pool, &form) -> Result<ValidatedData, AppError::Validation(FormErrors)>
//! ```
//!
//! Handlers compose that with their success branch; the error branch is the
//! `IntoResponse` impl of `AppError`.
//!
//! Field-level checks that need no database (lengths, email syntax, matching
//! passwords) are declared with `validator` attributes. "Required" is checked
//! first and by hand so that a blank field reports only that one message.

pub mod authentication;
pub mod password_reset;
pub mod registration;

pub use authentication::AuthenticationForm;
pub use password_reset::PasswordResetForm;
pub use registration::RegistrationForm;

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{rejection::FormRejection, FromRequest, Request},
    Form,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use validator::ValidationErrors;

/// Key for errors that belong to the form as a whole
pub const NON_FIELD_ERRORS: &str = "__all__";

pub const REQUIRED: &str = "This field is required.";

/// Field name → messages, serialized as a JSON object
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// A single form-level error
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Record [`REQUIRED`] for `field` if `value` is blank
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, REQUIRED);
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fold in `validator` output, skipping fields that already failed
    pub fn merge(&mut self, errors: ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            if self.has(&field) {
                continue;
            }
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                self.add(field.clone(), message);
            }
        }
    }

    /// `Ok(())` when nothing was recorded
    pub fn check(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl From<FormErrors> for AppError {
    fn from(errors: FormErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// A body that cannot be read as a form at all (wrong content type,
/// duplicated field) is a form-level validation error.
impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Validation(FormErrors::non_field(rejection.body_text()))
    }
}

/// `axum::Form` whose rejection renders like any other validation error
#[derive(Debug, Clone, Default)]
pub struct FormInput<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormInput<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await?;
        Ok(FormInput(value))
    }
}
