//! Filter set narrowing the lead list query.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Comparison applied by the remote API to a filter value.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    Contains,
}

impl FilterOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::Contains => "contains",
        }
    }
}

impl Display for FilterOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lead fields the dashboard can filter on, in query-string order.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Company,
    Email,
    IsQualified,
    ScoreMax,
    ScoreMin,
    Source,
    Status,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::Company,
        FilterField::Email,
        FilterField::IsQualified,
        FilterField::ScoreMax,
        FilterField::ScoreMin,
        FilterField::Source,
        FilterField::Status,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FilterField::Company => "company",
            FilterField::Email => "email",
            FilterField::IsQualified => "is_qualified",
            FilterField::ScoreMax => "score_max",
            FilterField::ScoreMin => "score_min",
            FilterField::Source => "source",
            FilterField::Status => "status",
        }
    }

    /// Operator the dashboard's filter inputs use for this field.
    pub const fn default_operator(self) -> FilterOperator {
        match self {
            FilterField::Company | FilterField::Email => FilterOperator::Contains,
            _ => FilterOperator::Equals,
        }
    }
}

impl Display for FilterField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single active filter. `value` is never empty.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Filter {
    value: String,
    operator: FilterOperator,
}

impl Filter {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }
}

/// Mapping from field to `{value, operator}`.
///
/// Presence of a key always implies a non-empty value: setting an empty
/// value removes the key instead of storing it.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct FilterSet {
    filters: BTreeMap<FilterField, Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or removes a filter. Returns `true` when the set changed.
    pub fn set(&mut self, field: FilterField, value: &str, operator: FilterOperator) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return self.filters.remove(&field).is_some();
        }

        let filter = Filter {
            value: value.to_string(),
            operator,
        };
        if self.filters.get(&field) == Some(&filter) {
            return false;
        }
        self.filters.insert(field, filter);
        true
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.filters.is_empty();
        self.filters.clear();
        changed
    }

    pub fn get(&self, field: FilterField) -> Option<&Filter> {
        self.filters.get(&field)
    }

    /// Current value of the filter, or `""` when the field is unfiltered.
    pub fn value_of(&self, field: FilterField) -> &str {
        self.get(field).map(Filter::value).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &Filter)> {
        self.filters.iter().map(|(field, filter)| (*field, filter))
    }

    /// Pairs sent to the remote API: `<field>=value` and
    /// `<field>_operator=operator` for every active filter.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .flat_map(|(field, filter)| {
                [
                    (field.as_str().to_string(), filter.value.clone()),
                    (
                        format!("{}_operator", field.as_str()),
                        filter.operator.as_str().to_string(),
                    ),
                ]
            })
            .collect()
    }
}
