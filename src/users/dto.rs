use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::users::repo_types::{NewUser, User};

/// Request body for create and full-replace update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserPayload {
    #[validate(length(min = 1, max = 50, message = "name must be between 1 and 50 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    #[validate(custom(function = "validate_email_domain"))]
    pub email: String,
}

/// Requires a dotted domain; `user@localhost` is not deliverable.
fn validate_email_domain(email: &str) -> Result<(), ValidationError> {
    match email.rsplit_once('@') {
        Some((_, domain)) if !domain.contains('.') => Err(ValidationError::new("email_domain")
            .with_message(Cow::Borrowed("email domain must contain a dot"))),
        _ => Ok(()),
    }
}

/// Domains are case-insensitive, so store them lowercased. The local part is
/// kept as sent.
fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

impl From<UserPayload> for NewUser {
    fn from(p: UserPayload) -> Self {
        Self {
            email: normalize_email(&p.email),
            name: p.name,
        }
    }
}

/// User as returned to the client.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, email: &str) -> UserPayload {
        UserPayload {
            name: name.into(),
            email: email.into(),
        }
    }

    #[test]
    fn accepts_name_at_both_length_bounds() {
        assert!(payload("A", "a@example.com").validate().is_ok());
        assert!(payload(&"x".repeat(50), "a@example.com").validate().is_ok());
    }

    #[test]
    fn rejects_empty_or_overlong_name() {
        assert!(payload("", "a@example.com").validate().is_err());
        assert!(payload(&"x".repeat(51), "a@example.com").validate().is_err());
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        assert!(payload(&"é".repeat(50), "a@example.com").validate().is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["", "plainaddress", "@example.com", "user@", "a b@example.com"] {
            assert!(payload("Alice", email).validate().is_err(), "{email} should fail");
        }
    }

    #[test]
    fn rejects_domain_without_dot() {
        let err = payload("Alice", "a@localhost").validate().unwrap_err();
        assert!(err.field_errors().contains_key("email"));
    }

    #[test]
    fn domain_is_lowercased_local_part_kept() {
        let new_user = NewUser::from(payload("Bob", "Bob.Smith@EXAMPLE.Com"));
        assert_eq!(new_user.email, "Bob.Smith@example.com");
    }

    #[test]
    fn response_serializes_id_name_email() {
        let body = UserResponse::from(User {
            id: 1,
            name: "Alice".into(),
            email: "alice@example.com".into(),
        });
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"id": 1, "name": "Alice", "email": "alice@example.com"})
        );
    }
}
