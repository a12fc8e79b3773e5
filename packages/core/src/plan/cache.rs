//! Layer cache planning
//!
//! The digest store records the node digests of the last successful build.
//! Comparing a freshly computed graph against the store yields a cache plan:
//! a node is a hit only when its digest is byte-identical to the stored one.
//! Because node digests fold in parent digests, a miss propagates to every
//! descendant without any extra bookkeeping here.

use super::graph::{BuildGraph, GraphError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the build root holding botpack state
pub const STATE_DIR: &str = ".botpack";

/// Digest store file name inside the state directory
pub const DIGEST_FILE: &str = "digests.json";

/// Errors raised while persisting the digest store
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read digest store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write digest store {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("digest store {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Node digests of the last successful build
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DigestStore {
    /// Store format version
    #[serde(default = "default_store_version")]
    pub version: u32,
    /// Digest per node id
    #[serde(default)]
    pub digests: BTreeMap<String, String>,
}

fn default_store_version() -> u32 {
    1
}

impl DigestStore {
    /// Conventional store location for a build root
    pub fn default_path(build_root: &Path) -> PathBuf {
        build_root.join(STATE_DIR).join(DIGEST_FILE)
    }

    /// Load the store, treating a missing file as an empty store
    ///
    /// An empty store means every node is a cache miss, which is exactly the
    /// first-build behavior.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| CacheError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CacheError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Persist the store, creating the state directory if needed
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CacheError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        std::fs::write(path, json + "\n").map_err(|source| CacheError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Cache verdict for one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Inputs byte-identical to the previous build; the step is skipped
    Hit,
    /// Inputs changed (or no previous build); the step re-executes
    Miss,
}

/// One node's entry in a cache plan
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub node_id: String,
    pub digest: String,
    pub outcome: CacheOutcome,
}

/// Per-node cache verdicts for a build, in dependency order
#[derive(Debug, Clone)]
pub struct CachePlan {
    entries: Vec<CacheEntry>,
}

impl CachePlan {
    /// Compare a graph against the previous build's digests
    ///
    /// Pure: no filesystem or daemon access. The verdict for a node depends
    /// only on its content digest.
    pub fn compute(graph: &BuildGraph, store: &DigestStore) -> Result<Self, GraphError> {
        let digests = graph.digests()?;
        let order = graph.topo_order()?;

        let entries = order
            .into_iter()
            .map(|node| {
                let digest = digests[&node.id].clone();
                let outcome = if store.digests.get(&node.id) == Some(&digest) {
                    CacheOutcome::Hit
                } else {
                    CacheOutcome::Miss
                };
                CacheEntry {
                    node_id: node.id.clone(),
                    digest,
                    outcome,
                }
            })
            .collect();

        Ok(Self { entries })
    }

    /// Entries in dependency order
    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    /// Verdict for a node id
    pub fn outcome(&self, node_id: &str) -> Option<CacheOutcome> {
        self.entries
            .iter()
            .find(|e| e.node_id == node_id)
            .map(|e| e.outcome)
    }

    /// True when every node is a hit (nothing to rebuild)
    pub fn fully_cached(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.outcome == CacheOutcome::Hit)
    }

    /// Store to persist after this build succeeds
    pub fn to_store(&self) -> DigestStore {
        DigestStore {
            version: default_store_version(),
            digests: self
                .entries
                .iter()
                .map(|e| (e.node_id.clone(), e.digest.clone()))
                .collect(),
        }
    }
}
