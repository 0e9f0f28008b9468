//! Field-keyed request validation.
//!
//! Validation runs before any store mutation and reports every failing
//! field at once, keyed by field name, so clients can render errors next
//! to the inputs that caused them.

use std::collections::BTreeMap;

use serde::Serialize;

pub const MIN_PASSWORD_LEN: usize = 8;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

/// Errors aggregated under the login form rather than a single field.
pub const NON_FIELD: &str = "non_field_errors";

/// A set of validation messages keyed by field name.
///
/// Serializes as a flat JSON object, e.g.
/// `{"email": ["Enter a valid email address."]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single aggregated failure not attributable to one field.
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(NON_FIELD, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Ok when no field failed, otherwise the accumulated set.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Minimal structural check: one `@` with a dotted, non-degenerate domain.
/// Deliverability is the mail system's problem, not ours.
pub fn email_is_well_formed(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}

pub fn password_is_strong_enough(value: &str) -> bool {
    value.len() >= MIN_PASSWORD_LEN
}
