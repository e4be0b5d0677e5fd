//! Repository backed by the remote lead REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::auth::{AccessToken, AuthSession, Credentials, Registration, User};
use crate::domain::lead::{Lead, LeadPage, LeadPayload};
use crate::domain::types::LeadId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AuthGateway, LeadListQuery, LeadReader, LeadWriter};

/// `GET /leads/{id}` wraps the record, `POST`/`PUT` may or may not.
#[derive(Deserialize)]
#[serde(untagged)]
enum LeadEnvelope {
    Wrapped { lead: Lead },
    Bare(Lead),
}

impl LeadEnvelope {
    fn into_lead(self) -> Lead {
        match self {
            LeadEnvelope::Wrapped { lead } | LeadEnvelope::Bare(lead) => lead,
        }
    }
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Decode(err.to_string())
        } else {
            RepositoryError::Transport(err.to_string())
        }
    }
}

#[derive(Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
}

impl HttpRepository {
    /// Creates a repository talking to `base_url` (e.g. `https://host/api`).
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RepositoryError::Unexpected(format!("invalid API base url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::Unexpected(format!(
                "API base url cannot be a base: {base_url}"
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    /// Joins path segments onto the base url, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> RepositoryResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepositoryError::Unexpected("API base url cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        builder.bearer_auth(token.as_str())
    }

    async fn send(builder: RequestBuilder) -> RepositoryResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RepositoryError::from_status(status.as_u16(), &body))
    }

    async fn decode<T: DeserializeOwned>(builder: RequestBuilder) -> RepositoryResult<T> {
        let response = Self::send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RepositoryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl LeadReader for HttpRepository {
    async fn list_leads(
        &self,
        token: &AccessToken,
        query: &LeadListQuery,
    ) -> RepositoryResult<LeadPage> {
        let url = self.endpoint(&["leads"])?;
        let request = self
            .authorized(self.client.get(url), token)
            .query(&query.to_query_pairs());
        Self::decode(request).await
    }

    async fn get_lead(&self, token: &AccessToken, id: &LeadId) -> RepositoryResult<Lead> {
        let url = self.endpoint(&["leads", id.as_str()])?;
        let request = self.authorized(self.client.get(url), token);
        Self::decode::<LeadEnvelope>(request)
            .await
            .map(LeadEnvelope::into_lead)
    }
}

#[async_trait]
impl LeadWriter for HttpRepository {
    async fn create_lead(&self, token: &AccessToken, lead: &LeadPayload) -> RepositoryResult<Lead> {
        let url = self.endpoint(&["leads"])?;
        let request = self.authorized(self.client.post(url), token).json(lead);
        Self::decode::<LeadEnvelope>(request)
            .await
            .map(LeadEnvelope::into_lead)
    }

    async fn update_lead(
        &self,
        token: &AccessToken,
        id: &LeadId,
        lead: &LeadPayload,
    ) -> RepositoryResult<Lead> {
        let url = self.endpoint(&["leads", id.as_str()])?;
        let request = self.authorized(self.client.put(url), token).json(lead);
        Self::decode::<LeadEnvelope>(request)
            .await
            .map(LeadEnvelope::into_lead)
    }

    async fn delete_lead(&self, token: &AccessToken, id: &LeadId) -> RepositoryResult<()> {
        let url = self.endpoint(&["leads", id.as_str()])?;
        let request = self.authorized(self.client.delete(url), token);
        Self::send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for HttpRepository {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<AuthSession> {
        let url = self.endpoint(&["auth", "login"])?;
        Self::decode(self.client.post(url).json(credentials)).await
    }

    async fn register(&self, registration: &Registration) -> RepositoryResult<AuthSession> {
        let url = self.endpoint(&["auth", "register"])?;
        Self::decode(self.client.post(url).json(registration)).await
    }

    async fn current_user(&self, token: &AccessToken) -> RepositoryResult<User> {
        let url = self.endpoint(&["auth", "me"])?;
        let request = self.authorized(self.client.get(url), token);
        Self::decode::<UserEnvelope>(request)
            .await
            .map(|envelope| envelope.user)
    }

    async fn logout(&self, token: &AccessToken) -> RepositoryResult<()> {
        let url = self.endpoint(&["auth", "logout"])?;
        let request = self.authorized(self.client.post(url), token);
        Self::send(request).await?;
        Ok(())
    }
}
