use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::repo_types::{User, DEFAULT_ROLE};
use crate::error::FieldError;

/// Request body for user registration. Every field is optional at the
/// serde level so that missing fields surface as field errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document_type: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Registration input after validation and normalization.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub document_type: String,
    pub document: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn required(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Option<String>,
) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            errors.push(FieldError::new(field, "is required"));
            String::new()
        }
    }
}

impl RegisterRequest {
    /// Checks every field and reports all failures at once.
    pub fn validate(self) -> Result<Registration, Vec<FieldError>> {
        let mut errors = Vec::new();

        let first_name = required(&mut errors, "firstName", self.first_name);
        let last_name = required(&mut errors, "lastName", self.last_name);
        let document_type = required(&mut errors, "documentType", self.document_type);
        let document = required(&mut errors, "document", self.document);

        let email = required(&mut errors, "email", self.email).to_lowercase();
        if !email.is_empty() && !is_valid_email(&email) {
            errors.push(FieldError::new("email", "is not a valid email address"));
        }

        // Passwords are taken verbatim; surrounding whitespace is significant.
        let password = match self.password {
            Some(p) if !p.is_empty() => p,
            _ => {
                errors.push(FieldError::new("password", "is required"));
                String::new()
            }
        };

        let role = self
            .role
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Registration {
            first_name,
            last_name,
            document_type,
            document,
            email,
            password,
            role,
        })
    }
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the normalized email and the raw password.
    pub fn validate(self) -> Result<(String, String), Vec<FieldError>> {
        let mut errors = Vec::new();
        let email = required(&mut errors, "email", self.email).to_lowercase();
        let password = match self.password {
            Some(p) if !p.is_empty() => p,
            _ => {
                errors.push(FieldError::new("password", "is required"));
                String::new()
            }
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok((email, password))
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> RegisterRequest {
        RegisterRequest {
            first_name: Some("Ana".into()),
            last_name: Some("Lee".into()),
            document_type: Some("ID".into()),
            document: Some("123".into()),
            email: Some("a@x.com".into()),
            password: Some("hunter2".into()),
            role: None,
        }
    }

    #[test]
    fn defaults_role_to_guest() {
        let reg = full_request().validate().expect("valid");
        assert_eq!(reg.role, "guest");

        let reg = RegisterRequest {
            role: Some("   ".into()),
            ..full_request()
        }
        .validate()
        .expect("valid");
        assert_eq!(reg.role, "guest");

        let reg = RegisterRequest {
            role: Some("admin".into()),
            ..full_request()
        }
        .validate()
        .expect("valid");
        assert_eq!(reg.role, "admin");
    }

    #[test]
    fn normalizes_email_and_trims_names() {
        let reg = RegisterRequest {
            email: Some("  Ana.Lee@Example.COM ".into()),
            first_name: Some(" Ana ".into()),
            ..full_request()
        }
        .validate()
        .expect("valid");
        assert_eq!(reg.email, "ana.lee@example.com");
        assert_eq!(reg.first_name, "Ana");
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = RegisterRequest::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "firstName",
                "lastName",
                "documentType",
                "document",
                "email",
                "password"
            ]
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let errors = RegisterRequest {
            last_name: Some("   ".into()),
            password: Some(String::new()),
            ..full_request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::new("lastName", "is required"),
                FieldError::new("password", "is required"),
            ]
        );
    }

    #[test]
    fn rejects_malformed_email() {
        let errors = RegisterRequest {
            email: Some("not-an-email".into()),
            ..full_request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn parses_camel_case_body() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"firstName":"Ana","lastName":"Lee","documentType":"ID","document":"123",
                "email":"a@x.com","password":"hunter2"}"#,
        )
        .unwrap();
        assert_eq!(req.document_type.as_deref(), Some("ID"));
        assert!(req.role.is_none());
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginRequest::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);

        let (email, password) = LoginRequest {
            email: Some(" A@X.com".into()),
            password: Some(" pw ".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(email, "a@x.com");
        assert_eq!(password, " pw ");
    }
}
