//! Granularity tunables.
//!
//! Every cutoff is carried in an explicit [`Tunables`] value handed to the
//! engine or reducer, so two solves with different settings can run side by
//! side. Environment overrides use the `BF_*` variables.

use serde::{Deserialize, Serialize};

use crate::error::{BfError, Result};

pub const ENV_ARRAY_CUTOFF: &str = "BF_ARRAY_CUTOFF";
pub const ENV_SERIAL_EDGE_CUTOFF: &str = "BF_SERIAL_EDGE_CUTOFF";
pub const ENV_BFS_CUTOFF: &str = "BF_BFS_CUTOFF";
pub const ENV_COMMUNICATE_CUTOFF: &str = "BF_COMMUNICATE_CUTOFF";
pub const ENV_INLINE_DEGREE: &str = "BF_INLINE_DEGREE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Array pieces weighing at most this many units are folded sequentially.
    pub array_cutoff: usize,
    /// All-edges variant: vertex ranges with fewer in-edges run serially.
    pub serial_edge_cutoff: usize,
    /// Frontier variants: frontiers with at most this many out-edges run inline.
    pub bfs_cutoff: usize,
    /// Edges processed between two cooperation polls.
    pub communicate_cutoff: usize,
    /// Per-vertex variant: in-degree from which a vertex gets a parallel loop.
    pub inline_degree: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self { array_cutoff: 2048, serial_edge_cutoff: 4096, bfs_cutoff: 1024, communicate_cutoff: 1024, inline_degree: 1000 }
    }
}

fn parse_var<F>(get: &F, key: &'static str, name: &'static str) -> Result<Option<usize>>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse::<usize>().map(Some).map_err(|e| BfError::InvalidTunable { name, reason: format!("{key}={raw:?}: {e}") }),
        None => Ok(None),
    }
}

impl Tunables {
    /// Defaults overridden by any `BF_*` variable present in the environment.
    pub fn from_env() -> Result<Self> { Self::from_vars(|key| std::env::var(key).ok()) }

    /// Same as [`Tunables::from_env`] over an arbitrary key lookup.
    pub fn from_vars<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut t = Self::default();
        if let Some(v) = parse_var(&get, ENV_ARRAY_CUTOFF, "array_cutoff")? { t.array_cutoff = v; }
        if let Some(v) = parse_var(&get, ENV_SERIAL_EDGE_CUTOFF, "serial_edge_cutoff")? { t.serial_edge_cutoff = v; }
        if let Some(v) = parse_var(&get, ENV_BFS_CUTOFF, "bfs_cutoff")? { t.bfs_cutoff = v; }
        if let Some(v) = parse_var(&get, ENV_COMMUNICATE_CUTOFF, "communicate_cutoff")? { t.communicate_cutoff = v; }
        if let Some(v) = parse_var(&get, ENV_INLINE_DEGREE, "inline_degree")? { t.inline_degree = v; }
        t.validate()?;
        Ok(t)
    }

    /// Parses a JSON object; missing fields keep their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        let t: Tunables = serde_json::from_str(s)?;
        t.validate()?;
        Ok(t)
    }

    /// Same cutoff everywhere; handy for forcing deep splits in tests.
    pub fn uniform(cutoff: usize) -> Self {
        Self { array_cutoff: cutoff, serial_edge_cutoff: cutoff, bfs_cutoff: cutoff, communicate_cutoff: cutoff, inline_degree: cutoff }
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("array_cutoff", self.array_cutoff),
            ("serial_edge_cutoff", self.serial_edge_cutoff),
            ("bfs_cutoff", self.bfs_cutoff),
            ("communicate_cutoff", self.communicate_cutoff),
            ("inline_degree", self.inline_degree),
        ];
        for (name, v) in fields {
            if v == 0 { return Err(BfError::InvalidTunable { name, reason: "must be at least 1".into() }); }
        }
        Ok(())
    }
}
