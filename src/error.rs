//! Error type shared by the reducer, the graph builders and the solver.
//!
//! Everything except `NegativeCycle` is raised before any parallel work
//! starts; `NegativeCycle` is the explicit non-convergence outcome.

use thiserror::Error;

use crate::bellman_ford::SolveStats;
use crate::graph::{Dist, VertexId};

#[derive(Error, Debug)]
pub enum BfError {
    /// A cutoff was zero or could not be parsed.
    #[error("invalid tunable `{name}`: {reason}")]
    InvalidTunable { name: &'static str, reason: String },

    #[error("source vertex {vertex} out of range (graph has {nb_vertices} vertices)")]
    SourceOutOfRange { vertex: VertexId, nb_vertices: usize },

    #[error("no source vertex given")]
    NoSources,

    /// Seed distances must lie strictly between the two sentinels.
    #[error("seed vertex {vertex} has reserved initial distance {dist}")]
    InvalidSeedDistance { vertex: VertexId, dist: Dist },

    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    /// The round loop hit its cap and a negative cycle is reachable from the
    /// sources. `distances` holds the normalized array: every vertex reachable
    /// from the cycle is set to `MINUS_INF`. `stats` describes the capped run.
    #[error("negative cycle reachable from the sources ({affected} vertices unresolved)")]
    NegativeCycle { affected: usize, distances: Vec<Dist>, stats: SolveStats },

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("tunables json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BfError>;

impl BfError {
    /// Stable negative code used by the C entry points.
    pub fn code(&self) -> i32 {
        match self {
            BfError::NoSources => -1,
            BfError::SourceOutOfRange { .. } | BfError::InvalidSeedDistance { .. } => -2,
            BfError::MalformedGraph(_) => -4,
            BfError::NegativeCycle { .. } => -5,
            BfError::InvalidTunable { .. } | BfError::Json(_) => -7,
            BfError::ThreadPool(_) => -8,
        }
    }
}
