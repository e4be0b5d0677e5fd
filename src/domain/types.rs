//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce the invariants of lead data (non-empty contact
//! fields, bounded score, non-negative value, known enum variants) so that a
//! payload that reaches the API layer can be treated as trusted.
use std::sync::LazyLock;
use std::{ops::Deref, str::FromStr};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Basic `local@domain.tld` shape accepted for lead emails.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided email did not look like `local@domain`.
    #[error("invalid email address")]
    InvalidEmail,
    /// Score outside of `0..=100`.
    #[error("score must be between 0 and 100")]
    ScoreOutOfRange,
    /// Lead value below zero or not a finite number.
    #[error("lead value must be a non-negative number")]
    NegativeLeadValue,
    /// Unknown lead source label.
    #[error("unknown lead source: {0}")]
    UnknownSource(String),
    /// Unknown lead status label.
    #[error("unknown lead status: {0}")]
    UnknownStatus(String),
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(LeadId, "Opaque identifier assigned to a lead by the remote API.");

non_empty_string_newtype!(UserId, "Opaque identifier of a signed-in dashboard user.");

/// Email of a lead, trimmed and checked against the `local@domain` shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LeadEmail(String);

impl LeadEmail {
    /// Trims the input and verifies the basic email shape.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let trimmed = email.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !EMAIL_SHAPE.is_match(&trimmed) {
            return Err(TypeConstraintError::InvalidEmail);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for LeadEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<LeadEmail> for String {
    fn from(value: LeadEmail) -> Self {
        value.0
    }
}

/// Lead quality rating bounded to `0..=100`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    pub const MIN: i64 = 0;
    pub const MAX: i64 = 100;

    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(TypeConstraintError::ScoreOutOfRange)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = TypeConstraintError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i64 {
    fn from(value: Score) -> Self {
        i64::from(value.0)
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monetary value attached to a lead. Always finite and non-negative.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(try_from = "f64", into = "f64")]
pub struct LeadValue(f64);

impl LeadValue {
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeLeadValue)
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for LeadValue {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LeadValue> for f64 {
    fn from(value: LeadValue) -> Self {
        value.0
    }
}

/// Channel a lead was acquired through.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    #[default]
    Website,
    FacebookAds,
    GoogleAds,
    Referral,
    Events,
    Other,
}

impl LeadSource {
    pub const ALL: [LeadSource; 6] = [
        LeadSource::Website,
        LeadSource::FacebookAds,
        LeadSource::GoogleAds,
        LeadSource::Referral,
        LeadSource::Events,
        LeadSource::Other,
    ];

    /// Wire value used by the remote API and in query strings.
    pub const fn as_str(self) -> &'static str {
        match self {
            LeadSource::Website => "website",
            LeadSource::FacebookAds => "facebook_ads",
            LeadSource::GoogleAds => "google_ads",
            LeadSource::Referral => "referral",
            LeadSource::Events => "events",
            LeadSource::Other => "other",
        }
    }

    /// Human readable label for select boxes.
    pub const fn label(self) -> &'static str {
        match self {
            LeadSource::Website => "Website",
            LeadSource::FacebookAds => "Facebook Ads",
            LeadSource::GoogleAds => "Google Ads",
            LeadSource::Referral => "Referral",
            LeadSource::Events => "Events",
            LeadSource::Other => "Other",
        }
    }
}

impl Display for LeadSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadSource {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LeadSource::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| TypeConstraintError::UnknownSource(s.to_string()))
    }
}

/// Position of a lead in the sales pipeline.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Lost,
    Won,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Lost,
        LeadStatus::Won,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Lost => "lost",
            LeadStatus::Won => "won",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Lost => "Lost",
            LeadStatus::Won => "Won",
        }
    }
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeConstraintError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_email_requires_basic_shape() {
        assert_eq!(
            LeadEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
        assert_eq!(LeadEmail::new("   "), Err(TypeConstraintError::EmptyString));
        assert_eq!(
            LeadEmail::new(" jane@acme.io ").unwrap().as_str(),
            "jane@acme.io"
        );
    }

    #[test]
    fn score_is_bounded() {
        assert!(Score::new(0).is_ok());
        assert!(Score::new(100).is_ok());
        assert_eq!(Score::new(-1), Err(TypeConstraintError::ScoreOutOfRange));
        assert_eq!(Score::new(101), Err(TypeConstraintError::ScoreOutOfRange));
    }

    #[test]
    fn lead_value_rejects_negative_and_nan() {
        assert!(LeadValue::new(0.0).is_ok());
        assert!(LeadValue::new(1500.25).is_ok());
        assert!(LeadValue::new(-0.01).is_err());
        assert!(LeadValue::new(f64::NAN).is_err());
    }

    #[test]
    fn enums_parse_wire_values() {
        assert_eq!(
            "facebook_ads".parse::<LeadSource>(),
            Ok(LeadSource::FacebookAds)
        );
        assert_eq!("won".parse::<LeadStatus>(), Ok(LeadStatus::Won));
        assert_eq!(
            "".parse::<LeadStatus>(),
            Err(TypeConstraintError::UnknownStatus(String::new()))
        );
        assert_eq!(
            serde_json::to_string(&LeadSource::GoogleAds).unwrap(),
            "\"google_ads\""
        );
    }
}
