use serde::{Deserialize, Serialize};

use crate::error::{GoCdError, Result};

/// Connection settings for a GoCD server.
///
/// The server URL should point at the root of the GoCD installation
/// (e.g., `https://gocd.example.com`); the `/go/api` prefix is appended
/// by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoCdConfig {
    /// Base URL of the GoCD server
    pub server_url: String,

    /// Credentials sent with every request, if any
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

/// Supported authentication schemes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Credentials {
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl GoCdConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            credentials: None,
        }
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer {
            token: token.into(),
        });
        self
    }

    /// Build a configuration from environment variables.
    ///
    /// Reads `GOCD_SERVER_URL` (required), and either `GOCD_TOKEN` or the
    /// `GOCD_USERNAME`/`GOCD_PASSWORD` pair. A token takes precedence when
    /// both are set.
    pub fn from_env() -> Result<Self> {
        let server_url = std::env::var("GOCD_SERVER_URL")
            .map_err(|_| GoCdError::Config("GOCD_SERVER_URL is not set".to_string()))?;

        let mut config = Self::new(server_url);

        if let Ok(token) = std::env::var("GOCD_TOKEN") {
            config = config.with_bearer_token(token);
        } else if let (Ok(username), Ok(password)) =
            (std::env::var("GOCD_USERNAME"), std::env::var("GOCD_PASSWORD"))
        {
            config = config.with_basic_auth(username, password);
        }

        Ok(config)
    }
}
