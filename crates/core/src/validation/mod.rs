//! Declarative request validation.
//!
//! Each validator checks a request payload against its schema and either
//! returns the validated values or every field failure at once, so the API
//! can report them together in a single 422 response.

mod error;
mod rules;
mod validators;

pub use error::{FieldError, Rule, ValidationErrors};
pub use rules::{email, is_valid_email, is_valid_url, min_length, required, url};
pub use validators::{
    validate_create_group, validate_create_user, validate_forgot_password,
    validate_reset_password, validate_update_user, NewUser, PasswordReset, PasswordResetLink,
    UserChanges, PASSWORD_MIN_LENGTH,
};
