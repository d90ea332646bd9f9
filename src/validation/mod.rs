//! Field validation for the member form.
//!
//! Validation is pure and synchronous. Email uniqueness is left to the server
//! and surfaces through the mutation failure path.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::{FormOptions, MemberDraft, MemberPayload};

pub const FULL_NAME_REQUIRED: &str = "Full name is required";
pub const EMAIL_REQUIRED: &str = "Email address is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const FUNCTION_REQUIRED: &str = "Function is required";
pub const FUNCTION_UNAVAILABLE: &str = "Select one of the offered functions";
pub const ROLE_REQUIRED: &str = "Role is required";
pub const ROLE_UNAVAILABLE: &str = "Select one of the offered roles";

/// Editable field of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    Function,
    Role,
}

impl Field {
    /// Wire name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Email => "email",
            Field::Function => "function",
            Field::Role => "role",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping of field to error message; empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, &'static str>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }

    /// One-line description, e.g. `email: Please enter a valid email address.`
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// `local@domain.tld`: ASCII only, no whitespace, exactly one `@`, and a dot
/// in the domain with non-empty labels on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    if !email.is_ascii() || email.chars().any(|c| c.is_ascii_whitespace()) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => {
            let (host, tld) = (&domain[..dot], &domain[dot + 1..]);
            !host.is_empty() && !tld.is_empty()
        }
        None => false,
    }
}

/// Validates drafts against the configured enumerated options.
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
    options: FormOptions,
}

impl FieldValidator {
    pub fn new(options: FormOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Inline errors for the draft as typed.
    ///
    /// An untouched (empty) email produces no error here, so the field stays
    /// quiet until the user has typed into it. Whitespace counts as typed.
    pub fn validate(&self, draft: &MemberDraft) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        if draft.full_name.trim().is_empty() {
            errors.insert(Field::FullName, FULL_NAME_REQUIRED);
        }

        if !draft.email.is_empty() && !is_valid_email(draft.email.trim()) {
            errors.insert(Field::Email, EMAIL_INVALID);
        }

        match draft.function {
            None => errors.insert(Field::Function, FUNCTION_REQUIRED),
            Some(f) if !self.options.allows_function(f) => {
                errors.insert(Field::Function, FUNCTION_UNAVAILABLE)
            }
            Some(_) => {}
        }

        match draft.role {
            None => errors.insert(Field::Role, ROLE_REQUIRED),
            Some(r) if !self.options.allows_role(r) => errors.insert(Field::Role, ROLE_UNAVAILABLE),
            Some(_) => {}
        }

        errors
    }

    /// Errors that block submission: the inline errors plus a required email.
    pub fn submit_errors(&self, draft: &MemberDraft) -> ValidationErrors {
        let mut errors = self.validate(draft);
        if draft.email.trim().is_empty() {
            errors.insert(Field::Email, EMAIL_REQUIRED);
        }
        errors
    }

    pub fn is_submit_eligible(&self, draft: &MemberDraft) -> bool {
        self.submit_errors(draft).is_empty()
    }

    /// Turn an eligible draft into the request body sent to the server.
    pub fn submit(&self, draft: &MemberDraft) -> Result<MemberPayload, ValidationErrors> {
        let errors = self.submit_errors(draft);
        match (draft.function, draft.role) {
            (Some(function), Some(role)) if errors.is_empty() => Ok(MemberPayload {
                full_name: draft.full_name.trim().to_string(),
                email: draft.email.trim().to_string(),
                function,
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobFunction, Role};

    fn complete_draft() -> MemberDraft {
        MemberDraft {
            full_name: "Jack Dao".into(),
            email: "jack@example.com".into(),
            function: Some(JobFunction::Engineering),
            role: Some(Role::Admin),
        }
    }

    #[test]
    fn test_email_pattern() {
        for ok in [
            "jack@example.com",
            "a.b+c@sub.domain.io",
            "x@y.z",
            "first_last@company.co.uk",
        ] {
            assert!(is_valid_email(ok), "{ok} should be valid");
        }
        for bad in [
            "invalid-email",
            "jack@",
            "@example.com",
            "jack@example",
            "jack@example.",
            "jack@.com",
            "ja ck@example.com",
            "jack@exa mple.com",
            "jack@@example.com",
            "jack@ex@ample.com",
            "jäck@example.com",
            "",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn test_empty_email_has_no_inline_error() {
        let validator = FieldValidator::default();
        let draft = MemberDraft {
            email: String::new(),
            ..complete_draft()
        };
        assert_eq!(validator.validate(&draft).get(Field::Email), None);
        assert_eq!(
            validator.submit_errors(&draft).get(Field::Email),
            Some(EMAIL_REQUIRED)
        );
        assert!(!validator.is_submit_eligible(&draft));
    }

    #[test]
    fn test_email_error_iff_non_empty_and_malformed() {
        let validator = FieldValidator::default();
        for (email, expect_error) in [
            ("", false),
            ("jack@example.com", false),
            ("invalid-email", true),
            ("jack@example", true),
            ("   ", true),
            ("  jack@example.com ", false),
        ] {
            let draft = MemberDraft {
                email: email.into(),
                ..complete_draft()
            };
            assert_eq!(
                validator.validate(&draft).get(Field::Email).is_some(),
                expect_error,
                "email {email:?}"
            );
        }
    }

    #[test]
    fn test_fresh_draft_reports_required_fields() {
        let validator = FieldValidator::default();
        let errors = validator.validate(&MemberDraft::default());
        assert_eq!(errors.get(Field::FullName), Some(FULL_NAME_REQUIRED));
        assert_eq!(errors.get(Field::Function), Some(FUNCTION_REQUIRED));
        assert_eq!(errors.get(Field::Role), Some(ROLE_REQUIRED));
        assert_eq!(errors.get(Field::Email), None);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_whitespace_name_is_empty() {
        let validator = FieldValidator::default();
        let draft = MemberDraft {
            full_name: "   ".into(),
            ..complete_draft()
        };
        assert_eq!(validator.validate(&draft).get(Field::FullName), Some(FULL_NAME_REQUIRED));
    }

    #[test]
    fn test_options_restrict_enumerations() {
        let validator = FieldValidator::new(FormOptions::new(
            vec![JobFunction::Product],
            vec![Role::Contributor],
        ));
        let errors = validator.validate(&complete_draft());
        assert_eq!(errors.get(Field::Function), Some(FUNCTION_UNAVAILABLE));
        assert_eq!(errors.get(Field::Role), Some(ROLE_UNAVAILABLE));
    }

    #[test]
    fn test_submit_builds_trimmed_payload() {
        let validator = FieldValidator::default();
        let draft = MemberDraft {
            full_name: "  Jack Dao ".into(),
            email: " jack@example.com ".into(),
            ..complete_draft()
        };
        let payload = validator.submit(&draft).unwrap();
        assert_eq!(payload.full_name(), "Jack Dao");
        assert_eq!(payload.email(), "jack@example.com");
        assert_eq!(payload.function(), JobFunction::Engineering);
        assert_eq!(payload.role(), Role::Admin);
    }

    #[test]
    fn test_submit_rejects_invalid_draft() {
        let validator = FieldValidator::default();
        let draft = MemberDraft {
            email: "nope".into(),
            role: None,
            ..complete_draft()
        };
        let errors = validator.submit(&draft).unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(EMAIL_INVALID));
        assert_eq!(errors.get(Field::Role), Some(ROLE_REQUIRED));
        assert_eq!(
            errors.summary(),
            "email: Please enter a valid email address.; role: Role is required"
        );
    }
}
