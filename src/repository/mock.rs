//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::auth::{AccessToken, AuthSession, Credentials, Registration, User};
use crate::domain::lead::{Lead, LeadPage, LeadPayload};
use crate::domain::types::LeadId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{AuthGateway, LeadListQuery, LeadReader, LeadWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl LeadReader for Repository {
        async fn list_leads(
            &self,
            token: &AccessToken,
            query: &LeadListQuery,
        ) -> RepositoryResult<LeadPage>;
        async fn get_lead(&self, token: &AccessToken, id: &LeadId) -> RepositoryResult<Lead>;
    }

    #[async_trait]
    impl LeadWriter for Repository {
        async fn create_lead(
            &self,
            token: &AccessToken,
            lead: &LeadPayload,
        ) -> RepositoryResult<Lead>;
        async fn update_lead(
            &self,
            token: &AccessToken,
            id: &LeadId,
            lead: &LeadPayload,
        ) -> RepositoryResult<Lead>;
        async fn delete_lead(&self, token: &AccessToken, id: &LeadId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl AuthGateway for Repository {
        async fn login(&self, credentials: &Credentials) -> RepositoryResult<AuthSession>;
        async fn register(&self, registration: &Registration) -> RepositoryResult<AuthSession>;
        async fn current_user(&self, token: &AccessToken) -> RepositoryResult<User>;
        async fn logout(&self, token: &AccessToken) -> RepositoryResult<()>;
    }
}
