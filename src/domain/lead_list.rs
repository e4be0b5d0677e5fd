//! Client-side state of the lead list: filters, pagination and the page of
//! leads last received from the server.
//!
//! Every fetch is issued under a [`FetchTicket`]. Only the response carrying
//! the most recent ticket is applied; responses of superseded fetches are
//! dropped so a slow request can never overwrite newer state.

use crate::domain::filter::{FilterField, FilterOperator, FilterSet};
use crate::domain::lead::{Lead, LeadPage};
use crate::pagination::PaginationState;

/// Generation token handed out by [`LeadListState::begin_fetch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// What happened to a response handed back to the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Stale,
}

#[derive(Clone, Debug)]
pub struct LeadListState {
    filters: FilterSet,
    pagination: PaginationState,
    /// Pagination of the page currently held in `leads`.
    loaded: PaginationState,
    leads: Vec<Lead>,
    loading: bool,
    generation: u64,
}

impl LeadListState {
    pub fn new(limit: usize) -> Self {
        Self {
            filters: FilterSet::new(),
            pagination: PaginationState::new(limit),
            loaded: PaginationState::new(limit),
            leads: Vec::new(),
            loading: false,
            generation: 0,
        }
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sets or clears one filter. Any change sends the list back to page 1.
    pub fn set_filter(&mut self, field: FilterField, value: &str, operator: FilterOperator) -> bool {
        let changed = self.filters.set(field, value, operator);
        if changed {
            self.pagination.page = 1;
        }
        changed
    }

    /// Applies every field of a submitted filter form. Fields absent from
    /// `filters` are cleared. Returns `true` when anything changed.
    pub fn replace_filters(&mut self, filters: FilterSet) -> bool {
        if filters.is_empty() {
            if self.filters.is_empty() {
                return false;
            }
            self.clear_filters();
            return true;
        }

        let mut changed = false;
        for field in FilterField::ALL {
            let (value, operator) = filters
                .get(field)
                .map_or(("", field.default_operator()), |filter| {
                    (filter.value(), filter.operator())
                });
            changed |= self.set_filter(field, value, operator);
        }
        changed
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.pagination.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.pagination.page = page.max(1);
    }

    /// Marks a fetch as in flight and returns its ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        FetchTicket(self.generation)
    }

    fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Replaces leads and pagination with the server's answer.
    pub fn apply_page(&mut self, ticket: FetchTicket, page: LeadPage) -> FetchOutcome {
        if !self.is_current(ticket) {
            return FetchOutcome::Stale;
        }

        self.leads = page.data;
        self.pagination = PaginationState {
            page: page.page.max(1),
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages,
        };
        self.loaded = self.pagination;
        self.loading = false;
        FetchOutcome::Applied
    }

    /// Records a failed fetch. Leads and pagination go back to the last
    /// page that was loaded.
    pub fn apply_failure(&mut self, ticket: FetchTicket) -> FetchOutcome {
        if !self.is_current(ticket) {
            return FetchOutcome::Stale;
        }
        self.pagination = self.loaded;
        self.loading = false;
        FetchOutcome::Applied
    }
}
