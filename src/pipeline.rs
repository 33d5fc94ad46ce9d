use log::{info, warn};
use serde::Deserialize;

use crate::client::{GoCdClient, ACCEPT_JSON};
use crate::error::Result;
use crate::graph::PipelineGraph;
use crate::types::{PipelineGroup, PipelineInstance, PipelineStatus};

/// View pipeline information and operate on pipelines.
pub struct PipelineManager<'a> {
    client: &'a GoCdClient,
}

#[derive(Deserialize)]
struct PipelineHistory {
    #[serde(default)]
    pipelines: Vec<PipelineInstance>,
}

impl<'a> PipelineManager<'a> {
    pub(crate) fn new(client: &'a GoCdClient) -> Self {
        Self { client }
    }

    /// List every pipeline the server knows about, linked into a
    /// dependency graph.
    ///
    /// Uses the `pipeline_groups` config endpoint, so each pipeline also
    /// carries the group it belongs to. The returned graph is a snapshot;
    /// call again for fresh data.
    pub async fn list(&self) -> Result<PipelineGraph> {
        let groups: Vec<PipelineGroup> = self
            .client
            .get_json("config/pipeline_groups", ACCEPT_JSON)
            .await?;

        let graph = PipelineGraph::build(groups)?;
        if graph.is_empty() {
            warn!("Server returned no pipelines");
        } else {
            info!("Fetched and linked {} pipelines", graph.len());
        }

        Ok(graph)
    }

    /// Past runs of a pipeline, newest first. `offset` tells the server
    /// how many instances to skip.
    pub async fn history(&self, name: &str, offset: usize) -> Result<Vec<PipelineInstance>> {
        let history: PipelineHistory = self
            .client
            .get_json(&format!("pipelines/{name}/history/{offset}"), ACCEPT_JSON)
            .await?;

        Ok(history.pipelines)
    }

    /// A single run of a pipeline, identified by its counter.
    pub async fn instance(&self, name: &str, counter: u64) -> Result<PipelineInstance> {
        self.client
            .get_json(
                &format!("pipelines/{name}/instance/{counter}"),
                ACCEPT_JSON,
            )
            .await
    }

    /// Whether the pipeline is paused, locked, and schedulable.
    pub async fn status(&self, name: &str) -> Result<PipelineStatus> {
        self.client
            .get_json(&format!("pipelines/{name}/status"), ACCEPT_JSON)
            .await
    }

    /// Pause the pipeline, recording `cause` as the reason.
    pub async fn pause(&self, name: &str, cause: &str) -> Result<()> {
        self.client
            .post_form(
                &format!("pipelines/{name}/pause"),
                &[("pauseCause", cause)],
            )
            .await
    }

    /// Unpause the pipeline.
    pub async fn unpause(&self, name: &str) -> Result<()> {
        self.client
            .post_text(&format!("pipelines/{name}/unpause"))
            .await?;
        Ok(())
    }

    /// Release a run lock so a new instance can start without waiting for
    /// the stuck one to finish. Returns the server's text confirmation.
    pub async fn release_lock(&self, name: &str) -> Result<String> {
        self.client
            .post_text(&format!("pipelines/{name}/releaseLock"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoCdConfig;
    use mockito::Matcher;

    fn pipeline_groups_body() -> &'static str {
        r#"[
            {
                "name": "build",
                "pipelines": [
                    {"name": "compile", "materials": [
                        {"type": "Git", "description": "https://git.example.com/app.git"}
                    ]},
                    {"name": "unit-tests", "materials": [
                        {"type": "Pipeline", "description": "compile"}
                    ]}
                ]
            },
            {
                "name": "release",
                "pipelines": [
                    {"name": "deploy", "materials": [
                        {"type": "Pipeline", "description": "unit-tests"}
                    ]}
                ]
            }
        ]"#
    }

    async fn client_for(server: &mockito::Server) -> GoCdClient {
        GoCdClient::new(&GoCdConfig::new(server.url())).unwrap()
    }

    #[tokio::test]
    async fn test_list_builds_linked_graph() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/go/api/config/pipeline_groups")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(pipeline_groups_body())
            .create_async()
            .await;

        let client = client_for(&server).await;
        let graph = client.pipelines().list().await.unwrap();

        assert_eq!(graph.len(), 3);

        let compile = graph.get("compile").unwrap();
        assert_eq!(compile.group(), "build");
        assert!(compile.predecessors().is_empty());

        let downstream: Vec<&str> = compile
            .transitive_descendants()
            .iter()
            .map(|node| node.name())
            .collect();
        assert_eq!(downstream, vec!["unit-tests", "deploy"]);

        let deploy = graph.get("deploy").unwrap();
        assert_eq!(deploy.group(), "release");
        assert_eq!(deploy.predecessors()[0].name(), "unit-tests");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_history_unwraps_pipelines_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/go/api/pipelines/deploy/history/5")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"pipelines": [
                    {"name": "deploy", "counter": 42, "label": "42", "stages": [
                        {"name": "rollout", "counter": "1", "result": "Passed", "jobs": [
                            {"name": "push", "state": "Completed", "result": "Passed",
                             "scheduled_date": 1436519914378}
                        ]}
                    ]}
                ]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server).await;
        let instances = client.pipelines().history("deploy", 5).await.unwrap();

        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].counter, 42);
        assert_eq!(instances[0].stages[0].name, "rollout");
        assert_eq!(instances[0].stages[0].jobs[0].result.as_deref(), Some("Passed"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_instance_by_counter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/go/api/pipelines/deploy/instance/7")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "deploy", "counter": 7, "stages": []}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let instance = client.pipelines().instance("deploy", 7).await.unwrap();

        assert_eq!(instance.name, "deploy");
        assert_eq!(instance.counter, 7);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_flags() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/go/api/pipelines/deploy/status")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"paused": true, "locked": false, "schedulable": false}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let status = client.pipelines().status("deploy").await.unwrap();

        assert!(status.paused);
        assert!(!status.locked);
        assert!(!status.schedulable);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pause_sends_cause() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/go/api/pipelines/deploy/pause")
            .match_body(Matcher::UrlEncoded(
                "pauseCause".to_string(),
                "maintenance window".to_string(),
            ))
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server).await;
        client
            .pipelines()
            .pause("deploy", "maintenance window")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unpause() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/go/api/pipelines/deploy/unpause")
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server).await;
        client.pipelines().unpause("deploy").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_release_lock_returns_confirmation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/go/api/pipelines/deploy/releaseLock")
            .with_status(200)
            .with_body("pipeline lock released for deploy\n")
            .create_async()
            .await;

        let client = client_for(&server).await;
        let confirmation = client.pipelines().release_lock("deploy").await.unwrap();

        assert!(confirmation.contains("lock released"));
        mock.assert_async().await;
    }
}
