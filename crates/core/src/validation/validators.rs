//! Schema validators for every request payload that carries user input.
//!
//! Validators only check shape. Checks that need storage (uniqueness, the
//! master existing) belong to the handlers, which report them through the
//! same [`ValidationErrors`].

use chrono::Utc;
use uuid::Uuid;

use super::error::{FieldError, Rule, ValidationErrors};
use super::rules::{email, min_length, required, url};
use crate::group::{CreateGroupRequest, Group};
use crate::user::{
    CreateUserRequest, ForgotPasswordRequest, ResetPasswordRequest, UpdateUserRequest, User,
};

/// Minimum password length, in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// A registration that passed validation. The password is still plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A profile update that passed validation. The password is still plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub email: String,
    pub password: String,
    pub avatar: String,
}

impl UserChanges {
    /// Merges the changes into `user`, storing `password_hash` in place of
    /// the plain-text password.
    pub fn apply_to(self, user: &mut User, password_hash: String) {
        user.email = self.email;
        user.avatar = Some(self.avatar);
        user.password_hash = password_hash;
        user.updated_at = Utc::now();
    }
}

/// A forgot-password request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetLink {
    pub email: String,
    pub reset_password_url: String,
}

/// A reset-password request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    pub token: String,
    pub password: String,
}

fn password(errors: &mut ValidationErrors, value: Option<&str>) -> Option<String> {
    errors
        .check(required("password", value).and_then(|p| min_length("password", p, PASSWORD_MIN_LENGTH)))
        .map(str::to_owned)
}

fn email_address(errors: &mut ValidationErrors, value: Option<&str>) -> Option<String> {
    errors
        .check(required("email", value).and_then(|e| email("email", e)))
        .map(str::to_owned)
}

fn required_string(errors: &mut ValidationErrors, field: &str, value: Option<&str>) -> Option<String> {
    errors.check(required(field, value)).map(str::to_owned)
}

pub fn validate_create_user(request: &CreateUserRequest) -> Result<NewUser, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let username = required_string(&mut errors, "username", request.username.as_deref());
    let email = email_address(&mut errors, request.email.as_deref());
    let password = password(&mut errors, request.password.as_deref());

    match (username, email, password) {
        (Some(username), Some(email), Some(password)) if errors.is_empty() => Ok(NewUser {
            username,
            email,
            password,
        }),
        _ => Err(errors),
    }
}

pub fn validate_update_user(request: &UpdateUserRequest) -> Result<UserChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let email = email_address(&mut errors, request.email.as_deref());
    let password = password(&mut errors, request.password.as_deref());
    let avatar = errors
        .check(required("avatar", request.avatar.as_deref()).and_then(|a| url("avatar", a)))
        .map(str::to_owned);

    match (email, password, avatar) {
        (Some(email), Some(password), Some(avatar)) if errors.is_empty() => Ok(UserChanges {
            email,
            password,
            avatar,
        }),
        _ => Err(errors),
    }
}

/// Validates a new group and builds it.
///
/// The returned group is not persisted and its master is not checked to
/// exist yet.
pub fn validate_create_group(request: &CreateGroupRequest) -> Result<Group, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required_string(&mut errors, "name", request.name.as_deref());
    let description = required_string(&mut errors, "description", request.description.as_deref());
    let schedule = required_string(&mut errors, "schedule", request.schedule.as_deref());
    let location = required_string(&mut errors, "location", request.location.as_deref());
    let chronic = required_string(&mut errors, "chronic", request.chronic.as_deref());
    let master_id: Option<Uuid> = request.master_id;
    if master_id.is_none() {
        errors.push(FieldError::new(
            Rule::Required,
            "masterId",
            "required validation failed",
        ));
    }

    match (name, description, schedule, location, chronic, master_id) {
        (
            Some(name),
            Some(description),
            Some(schedule),
            Some(location),
            Some(chronic),
            Some(master_id),
        ) if errors.is_empty() => Ok(Group::new(name, master_id)
            .with_description(description)
            .with_schedule(schedule)
            .with_location(location)
            .with_chronic(chronic)),
        _ => Err(errors),
    }
}

pub fn validate_forgot_password(
    request: &ForgotPasswordRequest,
) -> Result<PasswordResetLink, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let email = email_address(&mut errors, request.email.as_deref());
    let reset_password_url = errors
        .check(
            required("resetPasswordUrl", request.reset_password_url.as_deref())
                .and_then(|u| url("resetPasswordUrl", u)),
        )
        .map(str::to_owned);

    match (email, reset_password_url) {
        (Some(email), Some(reset_password_url)) if errors.is_empty() => Ok(PasswordResetLink {
            email,
            reset_password_url,
        }),
        _ => Err(errors),
    }
}

pub fn validate_reset_password(
    request: &ResetPasswordRequest,
) -> Result<PasswordReset, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let token = required_string(&mut errors, "token", request.token.as_deref());
    let password = password(&mut errors, request.password.as_deref());

    match (token, password) {
        (Some(token), Some(password)) if errors.is_empty() => Ok(PasswordReset { token, password }),
        _ => Err(errors),
    }
}
