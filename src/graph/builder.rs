use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::error::{GoCdError, Result};
use crate::graph::node::{Direction, GraphNode};
use crate::types::{Material, PipelineConfig, PipelineGroup};

struct Entry {
    config: PipelineConfig,
    group: String,
    predecessors: Vec<usize>,
    descendants: Vec<usize>,
}

/// The dependency graph over one fetched batch of pipeline definitions.
///
/// Built once from a `config/pipeline_groups` response and read-only
/// afterwards; refreshing the pipeline list means building a new graph,
/// never patching an existing one, so descendant data can never go stale.
pub struct PipelineGraph {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl PipelineGraph {
    /// Construct a fully linked graph from raw pipeline groups.
    ///
    /// Nodes keep the server's order: group order first, then pipeline
    /// order within each group. Predecessor edges come from each
    /// pipeline's own pipeline-kind materials; a material referencing a
    /// name outside the batch contributes no edge and no error, since the
    /// dependency may simply live in an unfetched group. Descendant edges
    /// are the inversion of all predecessor edges, computed in one pass
    /// over the complete node set through the name index (the pairwise
    /// scan this replaces would be quadratic, which is still acceptable at
    /// typical group sizes of tens to low hundreds of pipelines).
    ///
    /// Fails fast on records without a name and on duplicate names, since
    /// either would corrupt the name-keyed linking pass.
    pub fn build(groups: Vec<PipelineGroup>) -> Result<Self> {
        let mut entries = Vec::new();
        for group in groups {
            for config in group.pipelines {
                if config.name.is_empty() {
                    return Err(GoCdError::MissingName { group: group.name });
                }
                entries.push(Entry {
                    config,
                    group: group.name.clone(),
                    predecessors: Vec::new(),
                    descendants: Vec::new(),
                });
            }
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (id, entry) in entries.iter().enumerate() {
            if index.insert(entry.config.name.clone(), id).is_some() {
                return Err(GoCdError::DuplicateName {
                    name: entry.config.name.clone(),
                });
            }
        }

        for id in 0..entries.len() {
            let mut predecessors = Vec::new();
            for material in &entries[id].config.materials {
                let Some(upstream) = material.upstream_pipeline() else {
                    continue;
                };
                match index.get(upstream) {
                    Some(&upstream_id) => predecessors.push(upstream_id),
                    None => debug!(
                        "pipeline '{}' depends on '{}' which is not in this batch; edge dropped",
                        entries[id].config.name, upstream
                    ),
                }
            }
            entries[id].predecessors = predecessors;
        }

        // Invert predecessor edges into descendant edges. Walking ids in
        // ascending order keeps every descendant list in fetch order.
        for id in 0..entries.len() {
            let predecessors = entries[id].predecessors.clone();
            for upstream_id in predecessors {
                entries[upstream_id].descendants.push(id);
            }
        }

        Ok(Self { entries, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a pipeline by name.
    pub fn get(&self, name: &str) -> Option<PipelineNode<'_>> {
        self.index.get(name).map(|&id| PipelineNode { graph: self, id })
    }

    /// All pipelines in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = PipelineNode<'_>> {
        (0..self.entries.len()).map(move |id| PipelineNode { graph: self, id })
    }
}

impl fmt::Debug for PipelineGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.config.name))
            .finish()
    }
}

/// A pipeline definition linked into its dependency graph.
///
/// A cheap handle borrowing the graph; copies refer to the same vertex.
#[derive(Clone, Copy)]
pub struct PipelineNode<'a> {
    graph: &'a PipelineGraph,
    id: usize,
}

impl<'a> PipelineNode<'a> {
    fn entry(&self) -> &'a Entry {
        &self.graph.entries[self.id]
    }

    pub fn name(&self) -> &'a str {
        &self.entry().config.name
    }

    /// Name of the group this pipeline was fetched under.
    pub fn group(&self) -> &'a str {
        &self.entry().group
    }

    /// The raw pipeline definition as fetched from the server.
    pub fn config(&self) -> &'a PipelineConfig {
        &self.entry().config
    }

    pub fn materials(&self) -> &'a [Material] {
        &self.entry().config.materials
    }

    /// Pipelines this one directly depends on.
    pub fn predecessors(&self) -> Vec<PipelineNode<'a>> {
        self.neighbors(Direction::Upstream)
    }

    /// Pipelines that directly depend on this one.
    pub fn descendants(&self) -> Vec<PipelineNode<'a>> {
        self.neighbors(Direction::Downstream)
    }

    /// Every upstream pipeline reachable through predecessor edges.
    pub fn transitive_predecessors(&self) -> Vec<PipelineNode<'a>> {
        self.transitive(Direction::Upstream)
    }

    /// Every downstream pipeline reachable through descendant edges.
    pub fn transitive_descendants(&self) -> Vec<PipelineNode<'a>> {
        self.transitive(Direction::Downstream)
    }
}

impl GraphNode for PipelineNode<'_> {
    type Id = usize;

    fn id(&self) -> usize {
        self.id
    }

    fn neighbors(&self, direction: Direction) -> Vec<Self> {
        let edges = match direction {
            Direction::Upstream => &self.entry().predecessors,
            Direction::Downstream => &self.entry().descendants,
        };
        edges
            .iter()
            .map(|&id| PipelineNode {
                graph: self.graph,
                id,
            })
            .collect()
    }
}

impl PartialEq for PipelineNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl Eq for PipelineNode<'_> {}

impl fmt::Debug for PipelineNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineNode")
            .field("name", &self.name())
            .field("group", &self.group())
            .finish()
    }
}
