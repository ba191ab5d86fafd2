use serde::{Deserialize, Serialize};

use crate::error::{FieldError, InvoiceError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Drop blank values so they render as missing
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl StudentInfo {
    pub fn name(&self) -> Option<&str> {
        present(&self.name)
    }

    pub fn email(&self) -> Option<&str> {
        present(&self.email)
    }

    pub fn phone(&self) -> Option<&str> {
        present(&self.phone)
    }

    /// Check the fields that must hold before anything is rendered.
    /// Every failing field is reported, not just the first one.
    pub fn validate(&self, rules: &ValidationRules) -> Result<()> {
        let mut errors = Vec::new();

        if rules.require_name && self.name().is_none() {
            errors.push(FieldError {
                field: "name",
                message: "Student name is required".to_string(),
            });
        }

        if rules.check_email {
            if let Some(email) = self.email() {
                if !looks_like_email(email) {
                    errors.push(FieldError {
                        field: "email",
                        message: format!("'{email}' is not a valid email address"),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(InvoiceError::Validation(errors))
        }
    }
}

/// Which student fields are enforced before printing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default = "default_true")]
    pub require_name: bool,
    #[serde(default = "default_true")]
    pub check_email: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            require_name: true,
            check_email: true,
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: Option<&str>, email: Option<&str>) -> StudentInfo {
        StudentInfo {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            phone: None,
        }
    }

    fn field_names(err: InvoiceError) -> Vec<&'static str> {
        match err {
            InvoiceError::Validation(errors) => errors.iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_blank_fields_count_as_missing() {
        let info = student(Some("   "), Some(""));
        assert_eq!(info.name(), None);
        assert_eq!(info.email(), None);
    }

    #[test]
    fn test_values_are_trimmed() {
        let info = student(Some(" San Ratana "), None);
        assert_eq!(info.name(), Some("San Ratana"));
    }

    #[test]
    fn test_valid_student_passes() {
        let info = student(Some("San Ratana"), Some("sanratana18@gmail.com"));
        assert!(info.validate(&ValidationRules::default()).is_ok());
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let err = student(None, None)
            .validate(&ValidationRules::default())
            .unwrap_err();
        assert_eq!(field_names(err), vec!["name"]);
    }

    #[test]
    fn test_all_failures_are_reported() {
        let err = student(Some(""), Some("not-an-email"))
            .validate(&ValidationRules::default())
            .unwrap_err();
        assert_eq!(field_names(err), vec!["name", "email"]);
    }

    #[test]
    fn test_missing_email_is_fine() {
        let info = student(Some("San Ratana"), None);
        assert!(info.validate(&ValidationRules::default()).is_ok());
    }

    #[test]
    fn test_relaxed_rules() {
        let rules = ValidationRules {
            require_name: false,
            check_email: false,
        };
        assert!(student(None, Some("nope")).validate(&rules).is_ok());
    }

    #[test]
    fn test_email_shapes() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@bco"));
        assert!(!looks_like_email("a@b.co."));
        assert!(!looks_like_email("a@@b.co"));
        assert!(!looks_like_email("a b@c.co"));
    }
}
