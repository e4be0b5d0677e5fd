//! Lead list workflow behind `/dashboard` and lead deletion.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::domain::auth::{AccessToken, SignedIn};
use crate::domain::lead_list::{FetchOutcome, LeadListState};
use crate::dto::dashboard::{DASHBOARD_URL, DashboardPageData, dashboard_href};
pub use crate::dto::dashboard::DashboardQuery;
use crate::forms::lead::DeleteLeadForm;
use crate::repository::{LeadListQuery, LeadReader, LeadWriter};
use crate::services::leads::parse_lead_id;
use crate::services::{ServiceError, ServiceResult};

/// Lead list state of every signed-in user, keyed by user id.
///
/// The lock is only taken for short synchronous sections and is never held
/// across a call to the remote API.
#[derive(Debug, Default)]
pub struct LeadListStore {
    states: Mutex<HashMap<String, LeadListState>>,
}

impl LeadListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the state of `user_id`, creating it on first use.
    pub fn with_state<T>(
        &self,
        user_id: &str,
        page_size: usize,
        f: impl FnOnce(&mut LeadListState) -> T,
    ) -> T {
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        let state = states
            .entry(user_id.to_string())
            .or_insert_with(|| LeadListState::new(page_size));
        f(state)
    }

    /// Dashboard link back to the page and filters `user_id` last viewed.
    pub fn current_href(&self, user_id: &str) -> String {
        let states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        match states.get(user_id) {
            Some(state) => dashboard_href(state.filters(), state.pagination().page),
            None => DASHBOARD_URL.to_string(),
        }
    }

    /// Drops the state of `user_id`, e.g. on logout.
    pub fn forget(&self, user_id: &str) {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(user_id);
    }
}

/// Applies the filters and page from `query` to the user's list, fetches
/// the matching page and returns what the dashboard should render.
///
/// A failed fetch keeps the previously loaded leads and sets
/// `fetch_failed`. An expired token is reported as `Unauthorized`.
pub async fn load_dashboard<R>(
    repo: &R,
    store: &LeadListStore,
    signed_in: &SignedIn,
    query: DashboardQuery,
    page_size: usize,
) -> ServiceResult<DashboardPageData>
where
    R: LeadReader + ?Sized,
{
    let user_id = signed_in.user.id.as_str();

    let (ticket, list_query) = store.with_state(user_id, page_size, |state| {
        let filters_changed = state.replace_filters(query.filter_set());
        if !filters_changed {
            state.go_to_page(query.page.unwrap_or(1));
        }
        let ticket = state.begin_fetch();
        let list_query = LeadListQuery::new()
            .paginate(state.pagination().page, state.pagination().limit)
            .filters(state.filters());
        (ticket, list_query)
    });

    let result = repo.list_leads(&signed_in.token, &list_query).await;

    store.with_state(user_id, page_size, |state| match result {
        Ok(page) => {
            if state.apply_page(ticket, page) == FetchOutcome::Stale {
                log::debug!("Discarded a stale lead page for user {user_id}");
            }
            Ok(DashboardPageData::new(state, false))
        }
        Err(err) => {
            state.apply_failure(ticket);
            match ServiceError::from(err) {
                ServiceError::Unauthorized => Err(ServiceError::Unauthorized),
                err => {
                    log::error!("Failed to fetch leads: {err}");
                    Ok(DashboardPageData::new(state, true))
                }
            }
        }
    })
}

/// Deletes a lead once the user has confirmed the request.
pub async fn delete_lead<R>(
    repo: &R,
    token: &AccessToken,
    lead_id: &str,
    form: DeleteLeadForm,
) -> ServiceResult<()>
where
    R: LeadWriter + ?Sized,
{
    if !form.confirm {
        return Err(ServiceError::Form("Deletion was not confirmed".to_string()));
    }

    let lead_id = parse_lead_id(lead_id)?;

    repo.delete_lead(token, &lead_id).await.map_err(|err| {
        log::error!("Failed to delete lead {lead_id}: {err}");
        ServiceError::from(err)
    })
}
