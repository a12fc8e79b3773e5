//! Directed build graph with content-addressed nodes
//!
//! Each node is one image layer: a set of recipe instructions plus the
//! input files those instructions consume. A node's digest covers its
//! instructions, its inputs, and the digests of its parents, so a parent
//! rebuild always invalidates its descendants while a child edit never
//! touches a parent.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;

/// Role of a layer in the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Dependency environment: base image, baked env, manifest install
    Dependencies,
    /// Application payload and startup command
    Application,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Dependencies => write!(f, "dependencies"),
            LayerKind::Application => write!(f, "application"),
        }
    }
}

/// A named input blob consumed by a layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInput {
    /// Path of the input relative to the build root
    pub name: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl LayerInput {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }
}

/// One layer-build step in the graph
#[derive(Debug, Clone)]
pub struct LayerNode {
    /// Stable node identifier
    pub id: String,
    /// Layer role
    pub kind: LayerKind,
    /// Recipe instructions executed for this layer
    pub instructions: Vec<String>,
    /// Input blobs the instructions consume
    pub inputs: Vec<LayerInput>,
    /// Ids of nodes this layer builds on top of
    pub parents: Vec<String>,
}

/// Errors raised while traversing or digesting the graph
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    #[error("node '{node}' references unknown parent '{parent}'")]
    UnknownParent { node: String, parent: String },

    #[error("build graph contains a cycle involving '{0}'")]
    Cycle(String),
}

/// Directed graph of layer nodes
#[derive(Debug, Clone, Default)]
pub struct BuildGraph {
    nodes: Vec<LayerNode>,
}

impl BuildGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node; insertion order does not affect build order
    pub fn add_node(&mut self, node: LayerNode) {
        self.nodes.push(node);
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&LayerNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in dependency order (parents before children)
    ///
    /// Fails on duplicate ids, unknown parents, or cycles. Ties are broken
    /// by insertion order so the result is deterministic.
    pub fn topo_order(&self) -> Result<Vec<&LayerNode>, GraphError> {
        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }
        for node in &self.nodes {
            for parent in &node.parents {
                if !seen.contains(parent.as_str()) {
                    return Err(GraphError::UnknownParent {
                        node: node.id.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let mut order: Vec<&LayerNode> = Vec::with_capacity(self.nodes.len());
        let mut placed = std::collections::HashSet::new();
        while order.len() < self.nodes.len() {
            let before = order.len();
            for node in &self.nodes {
                if placed.contains(node.id.as_str()) {
                    continue;
                }
                if node.parents.iter().all(|p| placed.contains(p.as_str())) {
                    placed.insert(node.id.as_str());
                    order.push(node);
                }
            }
            if order.len() == before {
                let stuck = self
                    .nodes
                    .iter()
                    .find(|n| !placed.contains(n.id.as_str()))
                    .map(|n| n.id.clone())
                    .unwrap_or_default();
                return Err(GraphError::Cycle(stuck));
            }
        }
        Ok(order)
    }

    /// Content digest of every node, keyed by node id
    ///
    /// Digests are computed in dependency order; each node's digest folds in
    /// the digests of its parents.
    pub fn digests(&self) -> Result<BTreeMap<String, String>, GraphError> {
        let order = self.topo_order()?;
        let mut digests: BTreeMap<String, String> = BTreeMap::new();
        for node in order {
            let mut hasher = Sha256::new();
            hasher.update(node.id.as_bytes());
            hasher.update([0]);
            for instruction in &node.instructions {
                hasher.update(instruction.as_bytes());
                hasher.update([0]);
            }
            for input in &node.inputs {
                hasher.update(input.name.as_bytes());
                hasher.update([0]);
                hasher.update(&input.bytes);
                hasher.update([0]);
            }
            for parent in &node.parents {
                // Present because parents precede children in topo order
                hasher.update(digests[parent].as_bytes());
                hasher.update([0]);
            }
            digests.insert(node.id.clone(), format!("{:x}", hasher.finalize()));
        }
        Ok(digests)
    }
}
