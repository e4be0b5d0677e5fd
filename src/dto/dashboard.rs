//! DTOs shaped for the dashboard template.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::filter::{FilterField, FilterSet};
use crate::domain::lead::Lead;
use crate::domain::lead_list::LeadListState;
use crate::pagination::{PageNav, PaginationState};

pub const DASHBOARD_URL: &str = "/dashboard";

/// Query parameters accepted by `GET /dashboard`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct DashboardQuery {
    pub page: Option<usize>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub source: Option<String>,
    pub score_min: Option<String>,
    pub score_max: Option<String>,
    pub is_qualified: Option<String>,
}

impl DashboardQuery {
    fn value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Company => self.company.as_deref(),
            FilterField::Email => self.email.as_deref(),
            FilterField::IsQualified => self.is_qualified.as_deref(),
            FilterField::ScoreMax => self.score_max.as_deref(),
            FilterField::ScoreMin => self.score_min.as_deref(),
            FilterField::Source => self.source.as_deref(),
            FilterField::Status => self.status.as_deref(),
        }
    }

    /// Filters expressed by the query, each with its input's operator.
    pub fn filter_set(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        for field in FilterField::ALL {
            if let Some(value) = self.value(field) {
                filters.set(field, value, field.default_operator());
            }
        }
        filters
    }
}

/// Dashboard link to `page` that keeps the active filters.
pub fn dashboard_href(filters: &FilterSet, page: usize) -> String {
    let mut pairs = vec![("page".to_string(), page.to_string())];
    pairs.extend(
        filters
            .iter()
            .map(|(field, filter)| (field.as_str().to_string(), filter.value().to_string())),
    );
    match serde_html_form::to_string(&pairs) {
        Ok(query) => format!("{DASHBOARD_URL}?{query}"),
        Err(_) => format!("{DASHBOARD_URL}?page={page}"),
    }
}

/// Formats a dollar amount with thousands separators and at most two
/// decimals: `1234.5` becomes `$1,234.5`.
pub fn format_money(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let (sign, cents) = if cents < 0 { ("-", -cents) } else { ("", cents) };
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let fraction = match fraction {
        0 => String::new(),
        f if f % 10 == 0 => format!(".{}", f / 10),
        f => format!(".{f:02}"),
    };

    format!("{sign}${grouped}{fraction}")
}

/// One row of the leads table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeadRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub city: String,
    pub state: String,
    pub source: &'static str,
    pub source_label: String,
    pub status: &'static str,
    pub score: i64,
    pub value: String,
    pub is_qualified: bool,
    pub last_activity: String,
    pub edit_url: String,
    pub delete_url: String,
}

impl From<&Lead> for LeadRow {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id.to_string(),
            name: lead.full_name(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            company: lead.company.clone(),
            city: lead.city.clone(),
            state: lead.state.clone(),
            source: lead.source.as_str(),
            source_label: lead.source.as_str().replacen('_', " ", 1),
            status: lead.status.as_str(),
            score: lead.score,
            value: format_money(lead.lead_value),
            is_qualified: lead.is_qualified,
            last_activity: lead
                .last_activity_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "Never".to_string()),
            edit_url: format!("/leads/{}/edit", lead.id),
            delete_url: format!("/leads/{}/delete", lead.id),
        }
    }
}

/// Summary cards. Everything except `total` is computed from the leads of
/// the loaded page only, never from the server-wide total.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeadSummary {
    pub total: usize,
    pub qualified: usize,
    pub average_score: i64,
    pub total_value: f64,
    pub total_value_display: String,
}

impl LeadSummary {
    pub fn new(leads: &[Lead], server_total: usize) -> Self {
        let qualified = leads.iter().filter(|lead| lead.is_qualified).count();
        let average_score = if leads.is_empty() {
            0
        } else {
            let sum: i64 = leads.iter().map(|lead| lead.score).sum();
            (sum as f64 / leads.len() as f64).round() as i64
        };
        let total_value: f64 = leads.iter().map(|lead| lead.lead_value).sum();

        Self {
            total: server_total,
            qualified,
            average_score,
            total_value,
            total_value_display: format_money(total_value),
        }
    }
}

/// Data required to render the dashboard template.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPageData {
    pub rows: Vec<LeadRow>,
    pub summary: LeadSummary,
    pub pagination: PaginationState,
    pub nav: PageNav,
    /// Current filter input values keyed by field name.
    pub filters: BTreeMap<&'static str, String>,
    pub filtered: bool,
    pub showing: usize,
    pub loading: bool,
    /// Set when the latest fetch failed and older data is shown.
    #[serde(skip)]
    pub fetch_failed: bool,
}

impl DashboardPageData {
    pub fn new(state: &LeadListState, fetch_failed: bool) -> Self {
        let leads = state.leads();
        let pagination = *state.pagination();
        let filter_set = state.filters();

        let filters = FilterField::ALL
            .into_iter()
            .map(|field| (field.as_str(), filter_set.value_of(field).to_string()))
            .collect();

        Self {
            rows: leads.iter().map(LeadRow::from).collect(),
            summary: LeadSummary::new(leads, pagination.total),
            nav: PageNav::new(&pagination, |page| dashboard_href(filter_set, page)),
            pagination,
            filters,
            filtered: !filter_set.is_empty(),
            showing: leads.len(),
            loading: state.is_loading(),
            fetch_failed,
        }
    }
}
