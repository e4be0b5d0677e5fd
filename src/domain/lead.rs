use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{
    LeadEmail, LeadId, LeadSource, LeadStatus, LeadValue, NonEmptyString, Score,
};

/// Lead record as returned by the remote API.
///
/// Audit fields are server-owned; they are kept for display only and never
/// flow back into a write payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    #[serde(rename = "_id", alias = "id")]
    pub id: LeadId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub city: String,
    pub state: String,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub score: i64,
    pub lead_value: f64,
    #[serde(default)]
    pub is_qualified: bool,
    #[serde(default, deserialize_with = "utc_timestamp")]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "utc_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "utc_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<serde_json::Value>,
}

/// Reads RFC 3339 timestamps as sent, and offset-less ones as UTC.
fn utc_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

impl Lead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Validated body sent on `POST /leads` and `PUT /leads/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LeadPayload {
    pub first_name: NonEmptyString,
    pub last_name: NonEmptyString,
    pub email: LeadEmail,
    pub phone: NonEmptyString,
    pub company: NonEmptyString,
    pub city: NonEmptyString,
    pub state: NonEmptyString,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub score: Score,
    pub lead_value: LeadValue,
    pub is_qualified: bool,
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// One page of leads together with the server-reported pagination.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct LeadPage {
    pub data: Vec<Lead>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
}
