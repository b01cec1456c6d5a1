use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    Required,
    Email,
    MinLength,
    Url,
    Unique,
}

/// A single field failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub rule: Rule,
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(rule: Rule, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Failure for a value that must be unique but is already taken.
    pub fn unique(field: impl Into<String>) -> Self {
        Self::new(Rule::Unique, field, "unique validation failure")
    }
}

/// Every field failure found while validating one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("validation failure")]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure.
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Unwraps a rule outcome, recording the failure if there was one.
    pub fn check<T>(&mut self, outcome: Result<T, FieldError>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    /// Returns `Err(self)` if any failure was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true if `field` failed `rule`.
    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.errors.iter().any(|e| e.field == field && e.rule == rule)
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_records_failures() {
        let mut errors = ValidationErrors::new();

        let ok: Option<&str> = errors.check(Ok("value"));
        let failed: Option<&str> = errors.check(Err(FieldError::unique("email")));

        assert_eq!(ok, Some("value"));
        assert_eq!(failed, None);
        assert_eq!(errors.len(), 1);
        assert!(errors.has("email", Rule::Unique));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_empty_errors_into_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let errors = ValidationErrors::from(FieldError::new(
            Rule::MinLength,
            "password",
            "minLength validation failed",
        ));
        let json = serde_json::to_value(&errors).unwrap();

        assert_eq!(json[0]["rule"], "minLength");
        assert_eq!(json[0]["field"], "password");
        assert_eq!(json[0]["message"], "minLength validation failed");
    }
}
