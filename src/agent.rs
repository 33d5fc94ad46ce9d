use serde::{Deserialize, Serialize};

use crate::client::{GoCdClient, ACCEPT_AGENTS_V2};
use crate::error::Result;
use crate::types::ExtraFields;

/// A build agent registered with the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub uuid: String,

    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default)]
    pub ip_address: Option<String>,

    #[serde(default)]
    pub operating_system: Option<String>,

    /// Enabled, Disabled, or Pending
    #[serde(default)]
    pub agent_config_state: Option<String>,

    /// Idle, Building, LostContact, Missing...
    #[serde(default)]
    pub agent_state: Option<String>,

    #[serde(default)]
    pub build_state: Option<String>,

    #[serde(default)]
    pub resources: Vec<String>,

    #[serde(default)]
    pub environments: Vec<String>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// View and manage build agents.
pub struct AgentManager<'a> {
    client: &'a GoCdClient,
}

// The agents API wraps its collection in a HAL `_embedded` envelope.
#[derive(Deserialize)]
struct AgentsResponse {
    #[serde(rename = "_embedded")]
    embedded: EmbeddedAgents,
}

#[derive(Deserialize)]
struct EmbeddedAgents {
    #[serde(default)]
    agents: Vec<Agent>,
}

impl<'a> AgentManager<'a> {
    pub(crate) fn new(client: &'a GoCdClient) -> Self {
        Self { client }
    }

    /// All agents registered with the server.
    pub async fn list(&self) -> Result<Vec<Agent>> {
        let response: AgentsResponse = self.client.get_json("agents", ACCEPT_AGENTS_V2).await?;
        Ok(response.embedded.agents)
    }

    /// A single agent by its UUID.
    pub async fn get(&self, uuid: &str) -> Result<Agent> {
        self.client
            .get_json(&format!("agents/{uuid}"), ACCEPT_AGENTS_V2)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoCdConfig;

    #[tokio::test]
    async fn test_list_agents_uses_versioned_media_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/go/api/agents")
            .match_header("accept", "application/vnd.go.cd.v2+json")
            .with_status(200)
            .with_header("content-type", "application/vnd.go.cd.v2+json")
            .with_body(
                r#"{"_embedded": {"agents": [
                    {"uuid": "a1f2", "hostname": "agent-01", "ip_address": "10.0.0.5",
                     "agent_config_state": "Enabled", "agent_state": "Idle",
                     "resources": ["linux", "docker"], "free_space": 9281873920}
                ]}}"#,
            )
            .create_async()
            .await;

        let client = GoCdClient::new(&GoCdConfig::new(server.url())).unwrap();
        let agents = client.agents().list().await.unwrap();

        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].uuid, "a1f2");
        assert_eq!(agents[0].hostname.as_deref(), Some("agent-01"));
        assert_eq!(agents[0].resources, vec!["linux", "docker"]);
        assert_eq!(
            agents[0].extra["free_space"],
            serde_json::json!(9_281_873_920_u64)
        );

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_agent_by_uuid() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/go/api/agents/a1f2")
            .match_header("accept", "application/vnd.go.cd.v2+json")
            .with_status(200)
            .with_header("content-type", "application/vnd.go.cd.v2+json")
            .with_body(r#"{"uuid": "a1f2", "hostname": "agent-01", "build_state": "Building"}"#)
            .create_async()
            .await;

        let client = GoCdClient::new(&GoCdConfig::new(server.url())).unwrap();
        let agent = client.agents().get("a1f2").await.unwrap();

        assert_eq!(agent.uuid, "a1f2");
        assert_eq!(agent.build_state.as_deref(), Some("Building"));

        mock.assert_async().await;
    }
}
