//! Fork-join skeletons and parallel Bellman-Ford, with a stable C ABI.
//!
//! Everything parallel goes through one granularity-controlled divide and
//! conquer ([`reduce::reduce_input`]) on top of a [`Scheduler`]:
//!  - array reduce and the four prefix-scan orderings ([`reduce()`], [`scan()`])
//!  - the [`Frontier`] of active vertices with its un-relaxed out-edges
//!  - six Bellman-Ford variants ([`Variant`]), sequential baselines included
//!
//! Cutoffs are read from `BF_*` environment variables by [`Tunables::from_env`]
//! or passed explicitly to [`BellmanFord::new`].

pub mod atomics;
pub mod bellman_ford;
pub mod config;
pub mod error;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod frontier;
pub mod graph;
pub mod partition;
pub mod reduce;
pub mod scan;
pub mod sched;

pub use atomics::{DistArray, VisitedMarks};
pub use bellman_ford::{normalize, solve, BellmanFord, NoObserver, RoundObserver, RoundView, Solution, SolveStats, Variant};
pub use config::Tunables;
pub use error::{BfError, Result};
pub use frontier::Frontier;
pub use graph::{Dist, Graph, VertexId, Weight, INF, MINUS_INF};
pub use reduce::{reduce, Reducer, Splittable};
pub use scan::{scan, ScanKind};
pub use sched::{RayonScheduler, Scheduler, SequentialScheduler};
