use async_trait::async_trait;

use crate::{
    domain::{
        auth::{AccessToken, AuthSession, Credentials, Registration, User},
        filter::FilterSet,
        lead::{Lead, LeadPage, LeadPayload},
        types::LeadId,
    },
    pagination::DEFAULT_ITEMS_PER_PAGE,
    repository::errors::RepositoryResult,
};

pub mod errors;
#[cfg(feature = "server")]
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

#[cfg(feature = "server")]
pub use http::HttpRepository;

/// Description of a `GET /leads` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadListQuery {
    pub page: usize,
    pub limit: usize,
    pub filters: FilterSet,
}

impl LeadListQuery {
    pub fn new() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_ITEMS_PER_PAGE,
            filters: FilterSet::new(),
        }
    }

    pub fn paginate(mut self, page: usize, limit: usize) -> Self {
        self.page = page.max(1);
        self.limit = limit.max(1);
        self
    }

    pub fn filters(mut self, filters: &FilterSet) -> Self {
        self.filters = filters.clone();
        self
    }

    /// Query string pairs: `page`, `limit`, then every filter with its
    /// `<field>_operator` companion.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        pairs.extend(self.filters.query_pairs());
        pairs
    }
}

impl Default for LeadListQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
pub trait LeadReader {
    async fn list_leads(
        &self,
        token: &AccessToken,
        query: &LeadListQuery,
    ) -> RepositoryResult<LeadPage>;
    async fn get_lead(&self, token: &AccessToken, id: &LeadId) -> RepositoryResult<Lead>;
}

#[async_trait]
pub trait LeadWriter {
    async fn create_lead(&self, token: &AccessToken, lead: &LeadPayload) -> RepositoryResult<Lead>;
    async fn update_lead(
        &self,
        token: &AccessToken,
        id: &LeadId,
        lead: &LeadPayload,
    ) -> RepositoryResult<Lead>;
    async fn delete_lead(&self, token: &AccessToken, id: &LeadId) -> RepositoryResult<()>;
}

#[async_trait]
pub trait AuthGateway {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<AuthSession>;
    async fn register(&self, registration: &Registration) -> RepositoryResult<AuthSession>;
    async fn current_user(&self, token: &AccessToken) -> RepositoryResult<User>;
    async fn logout(&self, token: &AccessToken) -> RepositoryResult<()>;
}

/// Everything the dashboard needs from the remote API, shareable across
/// actix workers as `web::Data<dyn ApiRepository>`.
pub trait ApiRepository: LeadReader + LeadWriter + AuthGateway + Send + Sync {}

impl<T> ApiRepository for T where T: LeadReader + LeadWriter + AuthGateway + Send + Sync {}
