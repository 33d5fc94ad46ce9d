use log::debug;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::agent::AgentManager;
use crate::config::{Credentials, GoCdConfig};
use crate::error::{GoCdError, Result};
use crate::pipeline::PipelineManager;

/// Plain JSON, used by most endpoints.
pub(crate) const ACCEPT_JSON: &str = "application/json";
/// Versioned media type required by the agents API.
pub(crate) const ACCEPT_AGENTS_V2: &str = "application/vnd.go.cd.v2+json";

/// HTTP client for a GoCD server.
///
/// Owns the connection settings and hands out per-resource managers via
/// [`GoCdClient::pipelines`] and [`GoCdClient::agents`]. Cloning is cheap;
/// clones share the underlying connection pool.
#[derive(Clone)]
pub struct GoCdClient {
    http: reqwest::Client,
    base_api: Url,
    credentials: Option<Credentials>,
}

impl GoCdClient {
    pub fn new(config: &GoCdConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gocd-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GoCdError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Url::join drops the last path segment unless the base ends in a
        // slash, so normalize before appending the API prefix.
        let mut server_url = config.server_url.clone();
        if !server_url.ends_with('/') {
            server_url.push('/');
        }

        let base = Url::parse(&server_url)
            .map_err(|e| GoCdError::Config(format!("Invalid server URL: {e}")))?;
        let base_api = base
            .join("go/api/")
            .map_err(|e| GoCdError::Config(format!("Invalid API URL: {e}")))?;

        Ok(Self {
            http,
            base_api,
            credentials: config.credentials.clone(),
        })
    }

    /// Manager for pipeline resources.
    pub fn pipelines(&self) -> PipelineManager<'_> {
        PipelineManager::new(self)
    }

    /// Manager for build agent resources.
    pub fn agents(&self) -> AgentManager<'_> {
        AgentManager::new(self)
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        self.base_api
            .join(path)
            .map_err(|e| GoCdError::Config(format!("Invalid API path '{path}': {e}")))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(Credentials::Basic { username, password }) => {
                request.basic_auth(username, Some(password))
            }
            Some(Credentials::Bearer { token }) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        Err(GoCdError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub(crate) async fn get_json<T>(&self, path: &str, accept: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.api_url(path)?;
        debug!("GET {url}");

        let response = self
            .authorize(self.http.get(url).header(ACCEPT, accept))
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json().await?)
    }

    pub(crate) async fn post_form<F>(&self, path: &str, form: &F) -> Result<()>
    where
        F: Serialize + ?Sized,
    {
        let url = self.api_url(path)?;
        debug!("POST {url}");

        let response = self
            .authorize(self.http.post(url).header(ACCEPT, ACCEPT_JSON).form(form))
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    /// POST without a body, returning the raw response text.
    pub(crate) async fn post_text(&self, path: &str) -> Result<String> {
        let url = self.api_url(path)?;
        debug!("POST {url}");

        let response = self
            .authorize(self.http.post(url).header(ACCEPT, ACCEPT_JSON))
            .send()
            .await?;

        Ok(Self::check_status(response).await?.text().await?)
    }
}
