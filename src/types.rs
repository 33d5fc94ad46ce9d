use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server fields not modeled explicitly, preserved in declaration order so
/// payloads survive a round trip even as the server API evolves.
pub type ExtraFields = IndexMap<String, Value>;

/// Material type the server uses for pipeline-on-pipeline dependencies.
pub const PIPELINE_MATERIAL_TYPE: &str = "Pipeline";

/// A pipeline group as returned by `config/pipeline_groups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineGroup {
    pub name: String,

    #[serde(default)]
    pub pipelines: Vec<PipelineConfig>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A pipeline definition: the server-side workflow configuration, as
/// opposed to a concrete run of it (see [`PipelineInstance`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Declared upstream dependencies, in declaration order
    #[serde(default)]
    pub materials: Vec<Material>,

    #[serde(default)]
    pub stages: Vec<StageConfig>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A declared upstream dependency of a pipeline.
///
/// Materials cover source-control repositories, packages, and other
/// pipelines; only the last kind contributes dependency edges to the
/// pipeline graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "type")]
    pub kind: String,

    /// For pipeline-kind materials this carries the upstream pipeline name
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub fingerprint: Option<String>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Material {
    pub fn is_pipeline(&self) -> bool {
        self.kind == PIPELINE_MATERIAL_TYPE
    }

    /// Name of the upstream pipeline this material references, if it is a
    /// pipeline-kind material with a description.
    pub fn upstream_pipeline(&self) -> Option<&str> {
        if self.is_pipeline() {
            self.description.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub name: String,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Scheduling state of a pipeline, from `pipelines/{name}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStatus {
    #[serde(default)]
    pub paused: bool,

    #[serde(default)]
    pub locked: bool,

    #[serde(default)]
    pub schedulable: bool,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A concrete run of a pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineInstance {
    pub name: String,

    pub counter: u64,

    #[serde(default)]
    pub label: Option<String>,

    /// Stage runs in pipeline order
    #[serde(default)]
    pub stages: Vec<StageInstance>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A stage run within a pipeline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageInstance {
    pub name: String,

    // the server reports stage counters as strings
    #[serde(default)]
    pub counter: Option<String>,

    #[serde(default)]
    pub result: Option<String>,

    #[serde(default)]
    pub jobs: Vec<JobInstance>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A job run within a stage instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInstance {
    pub name: String,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub result: Option<String>,

    /// Scheduling time, reported by the server as epoch milliseconds
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub scheduled_date: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
