//! Contact form validator

use super::{rules::*, ValidationResult};
use crate::config::ContactLimits;
use crate::models::{SubmissionInput, ValidatedSubmission};
use validator::ValidationErrors;

pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PHONE: &str = "phone";
pub const FIELD_REFERRAL_SOURCE: &str = "referralSource";
pub const FIELD_MESSAGE: &str = "message";

/// Checks every field of a [`SubmissionInput`] and collects all violations.
#[derive(Debug, Clone, Default)]
pub struct ContactFormValidator {
    limits: ContactLimits,
}

impl ContactFormValidator {
    pub fn new(limits: ContactLimits) -> Self {
        Self { limits }
    }

    pub fn validate(&self, input: &SubmissionInput) -> Result<ValidatedSubmission, ValidationResult> {
        let mut errors = ValidationErrors::new();

        self.check_name(&input.name, &mut errors);
        self.check_email(&input.email, &mut errors);

        let phone = present(input.phone.as_deref());
        if let Some(phone) = phone {
            self.check_phone(phone, &mut errors);
        }

        let referral_source = present(input.referral_source.as_deref());
        if let Some(referral_source) = referral_source {
            collect(
                &mut errors,
                FIELD_REFERRAL_SOURCE,
                validate_max_length(
                    referral_source,
                    self.limits.referral_source_max,
                    format!(
                        "Referral source must be less than {} characters.",
                        self.limits.referral_source_max
                    ),
                ),
            );
        }

        self.check_message(&input.message, &mut errors);

        if !errors.errors().is_empty() {
            return Err(ValidationResult::from_validation_errors(errors));
        }

        Ok(ValidatedSubmission {
            name: input.name.trim().to_string(),
            email: input.email.clone(),
            phone: phone.map(str::to_string),
            referral_source: referral_source.map(str::to_string),
            message: input.message.clone(),
        })
    }

    fn check_name(&self, name: &str, errors: &mut ValidationErrors) {
        collect(
            errors,
            FIELD_NAME,
            validate_min_length(
                name,
                self.limits.name_min,
                format!("Name must be at least {} characters.", self.limits.name_min),
            ),
        );
        collect(
            errors,
            FIELD_NAME,
            validate_max_length(
                name,
                self.limits.name_max,
                format!("Name must be less than {} characters.", self.limits.name_max),
            ),
        );
        collect(errors, FIELD_NAME, validate_full_name(name));
    }

    fn check_email(&self, email: &str, errors: &mut ValidationErrors) {
        collect(errors, FIELD_EMAIL, validate_email(email));
        collect(
            errors,
            FIELD_EMAIL,
            validate_max_length(
                email,
                self.limits.email_max,
                format!(
                    "Email address must be at most {} characters.",
                    self.limits.email_max
                ),
            ),
        );
    }

    fn check_phone(&self, phone: &str, errors: &mut ValidationErrors) {
        collect(errors, FIELD_PHONE, validate_phone_characters(phone));
        collect(
            errors,
            FIELD_PHONE,
            validate_phone_digits(phone, self.limits.phone_min_digits),
        );
        collect(
            errors,
            FIELD_PHONE,
            validate_max_length(
                phone,
                self.limits.phone_max,
                format!(
                    "Phone number must be at most {} characters.",
                    self.limits.phone_max
                ),
            ),
        );
    }

    fn check_message(&self, message: &str, errors: &mut ValidationErrors) {
        collect(
            errors,
            FIELD_MESSAGE,
            validate_min_length(
                message,
                self.limits.message_min,
                format!(
                    "Message must be at least {} characters.",
                    self.limits.message_min
                ),
            ),
        );
        collect(
            errors,
            FIELD_MESSAGE,
            validate_max_length(message, self.limits.message_max, "Message is too long.".to_string()),
        );
    }
}

fn collect(
    errors: &mut ValidationErrors,
    field: &'static str,
    result: Result<(), validator::ValidationError>,
) {
    if let Err(error) = result {
        errors.add(field, error);
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str, message: &str) -> SubmissionInput {
        SubmissionInput {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            referral_source: None,
            message: message.to_string(),
        }
    }

    fn validator() -> ContactFormValidator {
        ContactFormValidator::default()
    }

    #[test]
    fn test_valid_submission() {
        let submission = validator()
            .validate(&input(
                " Jane Doe ",
                "jane@example.com",
                "Interested in a consultation for my lobby.",
            ))
            .unwrap();

        assert_eq!(submission.name(), "Jane Doe");
        assert_eq!(submission.email(), "jane@example.com");
        assert!(submission.phone().is_none());
        assert!(submission.referral_source().is_none());
    }

    #[test]
    fn test_single_word_name_rejected() {
        let result = validator()
            .validate(&input("Solo", "solo@example.com", "Hi there, need plants."))
            .unwrap_err();

        assert!(result.has_error(FIELD_NAME));
        assert_eq!(result.failed_fields(), vec![FIELD_NAME]);
    }

    #[test]
    fn test_short_name_reports_every_rule() {
        let result = validator()
            .validate(&input("J", "jane@example.com", "Need some ferns please"))
            .unwrap_err();

        assert_eq!(result.errors[FIELD_NAME].len(), 2);
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut raw = input("", "nope", "short");
        raw.phone = Some("12ab".to_string());
        raw.referral_source = Some("x".repeat(501));

        let result = validator().validate(&raw).unwrap_err();
        assert_eq!(
            result.failed_fields(),
            vec![FIELD_EMAIL, FIELD_MESSAGE, FIELD_NAME, FIELD_PHONE, FIELD_REFERRAL_SOURCE]
        );
    }

    #[test]
    fn test_message_boundaries() {
        let v = validator();

        assert!(v
            .validate(&input("Jane Doe", "jane@example.com", "123456789"))
            .unwrap_err()
            .has_error(FIELD_MESSAGE));
        assert!(v
            .validate(&input("Jane Doe", "jane@example.com", "1234567890"))
            .is_ok());
        assert!(v
            .validate(&input("Jane Doe", "jane@example.com", &"m".repeat(3000)))
            .is_ok());
        assert!(v
            .validate(&input("Jane Doe", "jane@example.com", &"m".repeat(3001)))
            .unwrap_err()
            .has_error(FIELD_MESSAGE));
    }

    #[test]
    fn test_phone_is_optional() {
        let mut raw = input("Jane Doe", "jane@example.com", "Need some ferns please");
        assert!(validator().validate(&raw).is_ok());

        raw.phone = Some(String::new());
        let submission = validator().validate(&raw).unwrap();
        assert!(submission.phone().is_none());
    }

    #[test]
    fn test_phone_rules() {
        let v = validator();
        let mut raw = input("Jane Doe", "jane@example.com", "Need some ferns please");

        raw.phone = Some("+1 (512) 555-0134".to_string());
        assert_eq!(
            v.validate(&raw).unwrap().phone(),
            Some("+1 (512) 555-0134")
        );

        raw.phone = Some("555-0134".to_string());
        assert!(v.validate(&raw).unwrap_err().has_error(FIELD_PHONE));

        raw.phone = Some("512.555.0134".to_string());
        assert!(v.validate(&raw).unwrap_err().has_error(FIELD_PHONE));

        raw.phone = Some("1 2 3 4 5 6 7 8 9 0 1".to_string());
        assert!(v.validate(&raw).unwrap_err().has_error(FIELD_PHONE));
    }

    #[test]
    fn test_email_length_limit() {
        let long_local = "a".repeat(250);
        let raw = input(
            "Jane Doe",
            &format!("{}@example.com", long_local),
            "Need some ferns please",
        );

        let result = validator().validate(&raw).unwrap_err();
        assert!(result.has_error(FIELD_EMAIL));
    }

    #[test]
    fn test_email_grammar() {
        let v = validator();

        let raw = input("Siobhan O'Brien", "o'brien@example.com", "Need some ferns please");
        assert_eq!(v.validate(&raw).unwrap().email(), "o'brien@example.com");

        for email in ["jane..doe@example.com", ".jane@example.com", "jane@-example.com"] {
            let raw = input("Jane Doe", email, "Need some ferns please");
            let result = v.validate(&raw).unwrap_err();
            assert_eq!(result.failed_fields(), vec![FIELD_EMAIL], "{}", email);
        }
    }

    #[test]
    fn test_custom_limits() {
        let limits = ContactLimits {
            message_min: 3,
            ..ContactLimits::default()
        };
        let v = ContactFormValidator::new(limits);

        assert!(v.validate(&input("Jane Doe", "jane@example.com", "Hey")).is_ok());
    }
}
