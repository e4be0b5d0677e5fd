use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::lead::{Lead, LeadPayload};
use crate::domain::types::{
    LeadEmail, LeadSource, LeadStatus, LeadValue, NonEmptyString, Score, TypeConstraintError,
};
use crate::forms::{FieldErrors, FormError};

/// Format of `<input type="datetime-local">` values.
const DATETIME_LOCAL: &str = "%Y-%m-%dT%H:%M";

#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq, Eq)]
/// Raw values of the create/edit lead form, exactly as submitted.
pub struct LeadForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "Source is required"))]
    pub source: String,
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    #[validate(length(min = 1, message = "Score is required"))]
    pub score: String,
    #[validate(length(min = 1, message = "Lead value is required"))]
    pub lead_value: String,
    #[serde(default)]
    pub last_activity_at: String,
    /// Checkbox value; absent when unchecked.
    #[serde(default)]
    pub is_qualified: Option<String>,
}

impl Default for LeadForm {
    /// Blank form shown in create mode.
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            city: String::new(),
            state: String::new(),
            source: LeadSource::Website.as_str().to_string(),
            status: LeadStatus::New.as_str().to_string(),
            score: "0".to_string(),
            lead_value: "0".to_string(),
            last_activity_at: String::new(),
            is_qualified: None,
        }
    }
}

impl From<&Lead> for LeadForm {
    /// Populates the editable fields of the form. Audit fields are skipped.
    fn from(lead: &Lead) -> Self {
        Self {
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            company: lead.company.clone(),
            city: lead.city.clone(),
            state: lead.state.clone(),
            source: lead.source.as_str().to_string(),
            status: lead.status.as_str().to_string(),
            score: lead.score.to_string(),
            lead_value: lead.lead_value.to_string(),
            last_activity_at: lead
                .last_activity_at
                .map(|at| at.format(DATETIME_LOCAL).to_string())
                .unwrap_or_default(),
            is_qualified: lead.is_qualified.then(|| "true".to_string()),
        }
    }
}

impl LeadForm {
    pub fn qualified(&self) -> bool {
        self.is_qualified
            .as_deref()
            .map(str::trim)
            .is_some_and(|value| matches!(value, "true" | "on" | "1" | "yes"))
    }
}

#[derive(Deserialize)]
/// Confirmation submitted with the delete button.
pub struct DeleteLeadForm {
    #[serde(default)]
    pub confirm: bool,
}

/// Parses the leading integer of `raw` the way browsers coerce number
/// inputs: `"57.8"` becomes 57, `"12abc"` becomes 12.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

fn parse_score(raw: &str) -> Result<Score, &'static str> {
    if raw.trim().is_empty() {
        return Err("Score is required");
    }
    let value = parse_leading_int(raw).ok_or("Score must be a number")?;
    if value < Score::MIN {
        return Err("Score must be at least 0");
    }
    Score::new(value).map_err(|_| "Score must be at most 100")
}

fn parse_lead_value(raw: &str) -> Result<LeadValue, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Lead value is required");
    }
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or("Lead value must be a number")?;
    LeadValue::new(value).map_err(|_| "Lead value must be at least 0")
}

/// Converts the activity input into an absolute UTC timestamp. Values
/// without an offset are taken as UTC.
pub fn parse_activity_at(raw: &str) -> Result<Option<DateTime<Utc>>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", DATETIME_LOCAL] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(at.and_utc()));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| Some(at.and_utc()))
        .ok_or("Invalid date")
}

fn take<T>(errors: &mut FieldErrors, field: &str, result: Result<T, &str>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

fn required(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    message: &'static str,
) -> Option<NonEmptyString> {
    take(errors, field, NonEmptyString::new(value).map_err(|_| message))
}

impl TryFrom<&LeadForm> for LeadPayload {
    type Error = FormError;

    /// Validates every field and coerces the raw strings into the typed
    /// payload. All failing fields are reported at once.
    fn try_from(form: &LeadForm) -> Result<Self, Self::Error> {
        let mut errors = match form.validate() {
            Ok(()) => FieldErrors::new(),
            Err(validation) => FieldErrors::from(&validation),
        };

        let first_name = required(&mut errors, "first_name", &form.first_name, "First name is required");
        let last_name = required(&mut errors, "last_name", &form.last_name, "Last name is required");
        let phone = required(&mut errors, "phone", &form.phone, "Phone is required");
        let company = required(&mut errors, "company", &form.company, "Company is required");
        let city = required(&mut errors, "city", &form.city, "City is required");
        let state = required(&mut errors, "state", &form.state, "State is required");

        let email = LeadEmail::new(form.email.as_str()).map_err(|err| match err {
            TypeConstraintError::EmptyString => "Email is required",
            _ => "Invalid email format",
        });
        let email = take(&mut errors, "email", email);

        let source = form
            .source
            .parse::<LeadSource>()
            .map_err(|_| "Source is required");
        let source = take(&mut errors, "source", source);
        let status = form
            .status
            .parse::<LeadStatus>()
            .map_err(|_| "Status is required");
        let status = take(&mut errors, "status", status);

        let score = take(&mut errors, "score", parse_score(&form.score));
        let lead_value = take(&mut errors, "lead_value", parse_lead_value(&form.lead_value));
        let last_activity_at = take(
            &mut errors,
            "last_activity_at",
            parse_activity_at(&form.last_activity_at),
        );

        let (
            Some(first_name),
            Some(last_name),
            Some(email),
            Some(phone),
            Some(company),
            Some(city),
            Some(state),
            Some(source),
            Some(status),
            Some(score),
            Some(lead_value),
            Some(last_activity_at),
        ) = (
            first_name,
            last_name,
            email,
            phone,
            company,
            city,
            state,
            source,
            status,
            score,
            lead_value,
            last_activity_at,
        )
        else {
            return Err(FormError::Fields(errors));
        };

        Ok(LeadPayload {
            first_name,
            last_name,
            email,
            phone,
            company,
            city,
            state,
            source,
            status,
            score,
            lead_value,
            is_qualified: form.qualified(),
            last_activity_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn filled_form() -> LeadForm {
        LeadForm {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@navy.mil".into(),
            phone: "555-0101".into(),
            company: "US Navy".into(),
            city: "Arlington".into(),
            state: "VA".into(),
            source: "referral".into(),
            status: "contacted".into(),
            score: "57".into(),
            lead_value: "1500.50".into(),
            last_activity_at: "2024-03-01T09:30".into(),
            is_qualified: Some("true".into()),
        }
    }

    fn errors_of(form: &LeadForm) -> FieldErrors {
        match LeadPayload::try_from(form) {
            Err(err) => err.field_errors(),
            Ok(payload) => panic!("expected validation failure, got {payload:?}"),
        }
    }

    #[test]
    fn converts_a_complete_form() {
        let payload = LeadPayload::try_from(&filled_form()).unwrap();

        assert_eq!(payload.first_name.as_str(), "Grace");
        assert_eq!(payload.source, LeadSource::Referral);
        assert_eq!(payload.status, LeadStatus::Contacted);
        assert_eq!(payload.score.get(), 57);
        assert_eq!(payload.lead_value.get(), 1500.5);
        assert!(payload.is_qualified);
        assert_eq!(
            payload.last_activity_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn invalid_email_is_reported_on_the_field() {
        let mut form = filled_form();
        form.email = "not-an-email".into();

        let errors = errors_of(&form);

        assert_eq!(errors.get("email"), Some("Invalid email format"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn blank_form_reports_every_required_field() {
        let form = LeadForm {
            source: String::new(),
            status: String::new(),
            score: String::new(),
            lead_value: String::new(),
            ..LeadForm::default()
        };

        let errors = errors_of(&form);

        assert_eq!(errors.get("first_name"), Some("First name is required"));
        assert_eq!(errors.get("last_name"), Some("Last name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("phone"), Some("Phone is required"));
        assert_eq!(errors.get("company"), Some("Company is required"));
        assert_eq!(errors.get("city"), Some("City is required"));
        assert_eq!(errors.get("state"), Some("State is required"));
        assert_eq!(errors.get("source"), Some("Source is required"));
        assert_eq!(errors.get("status"), Some("Status is required"));
        assert_eq!(errors.get("score"), Some("Score is required"));
        assert_eq!(errors.get("lead_value"), Some("Lead value is required"));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut form = filled_form();
        form.city = "   ".into();

        assert_eq!(errors_of(&form).get("city"), Some("City is required"));
    }

    #[test]
    fn score_bounds_are_enforced() {
        let mut form = filled_form();
        form.score = "-1".into();
        assert_eq!(errors_of(&form).get("score"), Some("Score must be at least 0"));

        form.score = "101".into();
        assert_eq!(errors_of(&form).get("score"), Some("Score must be at most 100"));
    }

    #[test]
    fn score_is_truncated_to_an_integer() {
        let mut form = filled_form();
        form.score = "99.9".into();

        let payload = LeadPayload::try_from(&form).unwrap();

        assert_eq!(payload.score.get(), 99);
    }

    #[test]
    fn negative_lead_value_is_rejected() {
        let mut form = filled_form();
        form.lead_value = "-5".into();

        assert_eq!(
            errors_of(&form).get("lead_value"),
            Some("Lead value must be at least 0")
        );
    }

    #[test]
    fn unchecked_box_and_empty_activity_coerce_to_false_and_null() {
        let mut form = filled_form();
        form.is_qualified = None;
        form.last_activity_at = String::new();

        let payload = LeadPayload::try_from(&form).unwrap();

        assert!(!payload.is_qualified);
        assert!(payload.last_activity_at.is_none());
    }

    #[test]
    fn activity_accepts_rfc3339_and_plain_dates() {
        assert_eq!(
            parse_activity_at("2024-03-01T09:30:00+02:00"),
            Ok(Some(Utc.with_ymd_and_hms(2024, 3, 1, 7, 30, 0).unwrap()))
        );
        assert_eq!(
            parse_activity_at("2024-03-01"),
            Ok(Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()))
        );
        assert_eq!(parse_activity_at("yesterday"), Err("Invalid date"));
    }

    #[test]
    fn populating_from_a_lead_maps_editable_fields_only() {
        let lead: Lead = serde_json::from_value(serde_json::json!({
            "_id": "l1",
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": "grace@navy.mil",
            "phone": "555",
            "company": "Navy",
            "city": "Arlington",
            "state": "VA",
            "source": "events",
            "status": "won",
            "score": 88,
            "lead_value": 100.0,
            "is_qualified": true,
            "last_activity_at": "2024-03-01T09:30:00Z",
            "created_at": "2024-01-01T00:00:00Z",
            "created_by": "admin"
        }))
        .unwrap();

        let form = LeadForm::from(&lead);

        assert_eq!(form.source, "events");
        assert_eq!(form.score, "88");
        assert_eq!(form.lead_value, "100");
        assert_eq!(form.last_activity_at, "2024-03-01T09:30");
        assert!(form.qualified());
    }
}
