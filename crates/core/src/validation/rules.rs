//! Individual validation rules.
//!
//! Each rule takes the field name and value and returns the value back on
//! success so rules can be chained with `and_then`.

use super::error::{FieldError, Rule};

/// The value must be present.
pub fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, FieldError> {
    value.ok_or_else(|| FieldError::new(Rule::Required, field, "required validation failed"))
}

/// The value must look like an email address.
pub fn email<'a>(field: &str, value: &'a str) -> Result<&'a str, FieldError> {
    if is_valid_email(value) {
        Ok(value)
    } else {
        Err(FieldError::new(Rule::Email, field, "email validation failed"))
    }
}

/// The value must be at least `min` characters long.
pub fn min_length<'a>(field: &str, value: &'a str, min: usize) -> Result<&'a str, FieldError> {
    if value.chars().count() >= min {
        Ok(value)
    } else {
        Err(FieldError::new(
            Rule::MinLength,
            field,
            "minLength validation failed",
        ))
    }
}

/// The value must be an absolute http(s) URL.
pub fn url<'a>(field: &str, value: &'a str) -> Result<&'a str, FieldError> {
    if is_valid_url(value) {
        Ok(value)
    } else {
        Err(FieldError::new(Rule::Url, field, "url validation failed"))
    }
}

/// Checks the `local@domain.tld` shape without whitespace.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Checks for an absolute URL with an http or https scheme and a host.
pub fn is_valid_url(value: &str) -> bool {
    match ::url::Url::parse(value) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required("name", Some("x")), Ok("x"));
        let err = required("name", None).unwrap_err();
        assert_eq!(err.rule, Rule::Required);
        assert_eq!(err.field, "name");
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("test@email.com"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("test@"));
        assert!(!is_valid_email("@email.com"));
        assert!(!is_valid_email("test"));
        assert!(!is_valid_email("test@email"));
        assert!(!is_valid_email("test@@email.com"));
        assert!(!is_valid_email("te st@email.com"));
        assert!(!is_valid_email("test@email..com"));
    }

    #[test]
    fn test_min_length_counts_characters() {
        assert!(min_length("password", "senha123", 8).is_ok());
        assert!(min_length("password", "senha12", 8).is_err());
        assert!(min_length("password", "çãõéíóúâ", 8).is_ok());
    }

    #[test]
    fn test_urls() {
        assert!(is_valid_url("https://url.com/image.png"));
        assert!(is_valid_url("http://localhost:3000/reset"));
        assert!(!is_valid_url("url"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url("ftp://files.example.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
    }
}
