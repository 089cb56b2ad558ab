//! Contact form payloads

use serde::{Deserialize, Serialize};

/// Untrusted body of `POST /api/contact`.
///
/// Absent text fields deserialize as empty strings so they are reported as
/// field errors instead of failing the parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub referral_source: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// A submission that passed [`crate::validation::ContactFormValidator`].
///
/// Only the validator constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) referral_source: Option<String>,
    pub(crate) message: String,
}

impl ValidatedSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn referral_source(&self) -> Option<&str> {
        self.referral_source.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let input: SubmissionInput = serde_json::from_str(r#"{"email": "a@b.co"}"#).unwrap();
        assert_eq!(input.name, "");
        assert_eq!(input.email, "a@b.co");
        assert!(input.phone.is_none());
        assert_eq!(input.message, "");
    }

    #[test]
    fn test_referral_source_uses_camel_case() {
        let input: SubmissionInput =
            serde_json::from_str(r#"{"referralSource": "A friend", "phone": null}"#).unwrap();
        assert_eq!(input.referral_source.as_deref(), Some("A friend"));
        assert!(input.phone.is_none());
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let result = serde_json::from_str::<SubmissionInput>(r#"{"name": 42}"#);
        assert!(result.is_err());
    }
}
