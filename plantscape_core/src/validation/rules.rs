//! Field rules for the contact form

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use validator::{ValidateEmail, ValidationError};

lazy_static! {
    /// Dot-separated local atoms (no leading, trailing or doubled dots) and
    /// hyphen-inner domain labels ending in an alphabetic TLD.
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9_'+-]+(\.[A-Za-z0-9_'+-]+)*@([A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$"
    ).unwrap();

    static ref PHONE_CHARACTERS_REGEX: Regex = Regex::new(
        r"^[0-9 ()+-]+$"
    ).unwrap();
}

pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn validate_min_length(value: &str, min: usize, message: String) -> Result<(), ValidationError> {
    if char_len(value) < min {
        return Err(field_error("length_min", message));
    }
    Ok(())
}

pub fn validate_max_length(value: &str, max: usize, message: String) -> Result<(), ValidationError> {
    if char_len(value) > max {
        return Err(field_error("length_max", message));
    }
    Ok(())
}

/// First and last name: at least two whitespace separated words.
pub fn validate_full_name(name: &str) -> Result<(), ValidationError> {
    if name.split_whitespace().count() < 2 {
        return Err(field_error(
            "full_name",
            "Please enter your full name (first and last name).",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !email.validate_email() || !EMAIL_REGEX.is_match(email) {
        return Err(field_error("email", "Please enter a valid email address."));
    }
    Ok(())
}

pub fn validate_phone_characters(phone: &str) -> Result<(), ValidationError> {
    if !PHONE_CHARACTERS_REGEX.is_match(phone) {
        return Err(field_error(
            "phone_characters",
            "Please enter a valid phone number.",
        ));
    }
    Ok(())
}

pub fn validate_phone_digits(phone: &str, min_digits: usize) -> Result<(), ValidationError> {
    if count_digits(phone) < min_digits {
        return Err(field_error(
            "phone_digits",
            format!("Phone number must contain at least {} digits.", min_digits),
        ));
    }
    Ok(())
}

pub fn count_digits(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_digit()).count()
}
