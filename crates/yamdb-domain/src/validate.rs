//! Field-level validation rules applied before a record is written.
//!
//! Every rule is a plain function returning [`ValidationError`] on rejection,
//! so it can be unit-tested without any entity or storage around it.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::clock::Clock;

/// Username that would collide with the `/users/me` alias.
pub const RESERVED_USERNAME: &str = "me";

/// Maximum length of an email address.
pub const EMAIL_MAX_LEN: usize = 254;

/// Maximum length of first/last name.
pub const PERSON_NAME_MAX_LEN: usize = 150;

/// Maximum length of a category, genre or title name.
pub const NAME_MAX_LEN: usize = 255;

/// Inclusive review score bounds.
pub const SCORE_MIN: i16 = 0;
pub const SCORE_MAX: i16 = 10;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9\-_.]{1,20}$").expect("valid regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

/// A rejected field value. The payload is the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username cannot be \"{0}\"")]
    ReservedUsername(String),
    #[error("invalid characters in username <{0}>")]
    InvalidUsername(String),
    #[error("year must not be greater than the current year {current}: got {year}")]
    FutureYear { year: i32, current: i32 },
    #[error("invalid slug <{0}>")]
    InvalidSlug(String),
    #[error("slug <{slug}> is longer than {max_len} characters")]
    SlugTooLong { slug: String, max_len: usize },
    #[error("invalid email address <{0}>")]
    InvalidEmail(String),
    #[error("name must be 1 to {max_len} characters: <{name}>")]
    InvalidName { name: String, max_len: usize },
    #[error("score must be between 0 and 10: got {0}")]
    ScoreOutOfRange(i16),
    #[error("text must not be empty")]
    EmptyText,
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReservedUsername(_) => "RESERVED_USERNAME",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::FutureYear { .. } => "FUTURE_YEAR",
            Self::InvalidSlug(_) | Self::SlugTooLong { .. } => "INVALID_SLUG",
            Self::InvalidEmail(_) => "INVALID_EMAIL",
            Self::InvalidName { .. } => "INVALID_NAME",
            Self::ScoreOutOfRange(_) => "SCORE_OUT_OF_RANGE",
            Self::EmptyText => "EMPTY_TEXT",
        }
    }
}

/// Reject the reserved name `me` (any letter case) and anything outside
/// `^[a-zA-Z][a-zA-Z0-9\-_.]{1,20}$`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.eq_ignore_ascii_case(RESERVED_USERNAME) {
        return Err(ValidationError::ReservedUsername(username.to_owned()));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::InvalidUsername(username.to_owned()));
    }
    Ok(())
}

/// Reject years after the clock's current calendar year.
pub fn validate_year(value: i32, clock: &impl Clock) -> Result<(), ValidationError> {
    let current = clock.current_year();
    if value > current {
        return Err(ValidationError::FutureYear {
            year: value,
            current,
        });
    }
    Ok(())
}

pub fn validate_slug(slug: &str, max_len: usize) -> Result<(), ValidationError> {
    if !SLUG_RE.is_match(slug) {
        return Err(ValidationError::InvalidSlug(slug.to_owned()));
    }
    if slug.chars().count() > max_len {
        return Err(ValidationError::SlugTooLong {
            slug: slug.to_owned(),
            max_len,
        });
    }
    Ok(())
}

/// Structural check only: one `@`, non-empty local part and domain, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_owned());
    if email.is_empty() || email.chars().count() > EMAIL_MAX_LEN {
        return Err(invalid());
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(invalid()),
    }
}

/// Name of a category, genre or title.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_bounded(name, 1, NAME_MAX_LEN)
}

/// First or last name of a user; may be empty.
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    validate_bounded(name, 0, PERSON_NAME_MAX_LEN)
}

fn validate_bounded(name: &str, min_len: usize, max_len: usize) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len < min_len || len > max_len || (min_len > 0 && name.trim().is_empty()) {
        return Err(ValidationError::InvalidName {
            name: name.to_owned(),
            max_len,
        });
    }
    Ok(())
}

pub fn validate_score(score: i16) -> Result<(), ValidationError> {
    if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        return Err(ValidationError::ScoreOutOfRange(score));
    }
    Ok(())
}

/// Review and comment bodies.
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(())
}
