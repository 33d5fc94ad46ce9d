//! A typed client for the GoCD continuous-delivery server REST API.
//!
//! Exposes pipelines, agents, and their runs as typed object graphs
//! instead of raw JSON. The pipeline listing goes one step further than
//! the server does: it links every pipeline to the pipelines it depends
//! on (predecessors) and the pipelines that depend on it (descendants),
//! with transitive traversal over both relations.
//!
//! ```no_run
//! use gocd_client::{GoCdClient, GoCdConfig};
//!
//! # async fn run() -> gocd_client::Result<()> {
//! let config = GoCdConfig::new("https://gocd.example.com").with_basic_auth("admin", "secret");
//! let client = GoCdClient::new(&config)?;
//!
//! let graph = client.pipelines().list().await?;
//! if let Some(pipeline) = graph.get("deploy") {
//!     for upstream in pipeline.transitive_predecessors() {
//!         println!("deploy depends on {}", upstream.name());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod types;

pub use agent::{Agent, AgentManager};
pub use client::GoCdClient;
pub use config::{Credentials, GoCdConfig};
pub use error::{GoCdError, Result};
pub use graph::{Direction, GraphNode, PipelineGraph, PipelineNode};
pub use pipeline::PipelineManager;
