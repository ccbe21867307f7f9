//! Structured field errors accumulated during validation.
//!
//! Validators never stop at the first violation: each one runs to
//! completion and returns an [`ErrorList`], which callers merge after
//! prefixing with their own field name. An empty list means valid.

use thiserror::Error;

/// A single validation violation, anchored to a field path.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A mandatory field is absent or empty.
    #[error("{field}: required value")]
    Required { field: String },

    /// A field is present but violates a constraint.
    #[error("{field}: invalid value \"{value}\": {reason}")]
    Invalid {
        field: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    /// Path of the field this error is anchored to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field } => field,
            ValidationError::Invalid { field, .. } => field,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self {
            ValidationError::Required { field } => field,
            ValidationError::Invalid { field, .. } => field,
        }
    }
}

/// An ordered, appendable list of validation violations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorList {
    errors: Vec<ValidationError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a missing mandatory field.
    pub fn required(&mut self, field: impl Into<String>) {
        self.errors.push(ValidationError::Required {
            field: field.into(),
        });
    }

    /// Record a constraint violation, carrying the offending value and a
    /// human-readable reason.
    pub fn invalid(
        &mut self,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.errors.push(ValidationError::Invalid {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        });
    }

    /// Append every error from another list.
    pub fn merge(&mut self, other: ErrorList) {
        self.errors.extend(other.errors);
    }

    /// Return the list with every contained error's path nested under
    /// `prefix`. Index segments (`[i]`) attach without a separating dot.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        for err in &mut self.errors {
            let field = err.field_mut();
            *field = if field.is_empty() {
                prefix.to_string()
            } else if field.starts_with('[') {
                format!("{prefix}{field}")
            } else {
                format!("{prefix}.{field}")
            };
        }
        self
    }

    /// Return the list with every contained error's path nested under the
    /// list index `[index]`.
    pub fn prefixed_index(self, index: usize) -> Self {
        self.prefixed(&format!("[{index}]"))
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// The accumulated errors, in the order they were recorded.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }
}

impl IntoIterator for ErrorList {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl std::fmt::Display for ErrorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
