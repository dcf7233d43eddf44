//! C ABI.
//!
//! Return codes: `0` success, `-1` empty graph, `-2` source out of range,
//! `-3` null pointer, `-4` malformed CSR, `-5` negative cycle (`out_dist`
//! still holds the normalized distances), `-6` unknown variant, `-7` bad
//! tunables in the environment, `-8` thread pool failure.

use core::slice;

use crate::bellman_ford::{BellmanFord, SolveStats, Variant};
use crate::config::Tunables;
use crate::error::BfError;
use crate::graph::Graph;
use crate::scan::{scan, ScanKind};
use crate::sched::RayonScheduler;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BfResultInfo {
    pub rounds: u32,
    pub relaxations: u64,   // successful strict-minimum writes
    pub forks: u64,
    pub converged: u8,      // 1 unless a negative cycle was found
    pub error_code: i32,    // 0 == success
}

impl BfResultInfo {
    fn from_stats(s: &SolveStats, error_code: i32) -> Self {
        Self { rounds: s.rounds as u32, relaxations: s.relaxations, forks: s.forks, converged: s.converged as u8, error_code }
    }
}

#[no_mangle]
pub extern "C" fn bf_version() -> u32 { 1 }

/// Runs one Bellman-Ford variant (`variant` indexes [`Variant::ALL`]) on an
/// out-adjacency CSR. Unreachable vertices get `i64::MAX`, vertices behind a
/// negative cycle `i64::MIN`.
///
/// # Safety
/// `offsets` must point to `n + 1` readable `u32`; `targets` and `weights` to
/// `offsets[n]` elements each; `out_dist` to `n` writable `i64`. `info` may
/// be null.
#[no_mangle]
pub unsafe extern "C" fn bf_run(
    n: u32,
    offsets: *const u32,
    targets: *const u32,
    weights: *const i64,
    source: u32,
    variant: i32,
    out_dist: *mut i64,
    info: *mut BfResultInfo,
) -> i32 {
    if n == 0 { return -1; }
    if source >= n { return -2; }
    if offsets.is_null() || targets.is_null() || weights.is_null() || out_dist.is_null() { return -3; }
    let Some(variant) = Variant::from_code(variant) else { return -6 };

    let n = n as usize;
    let off = slice::from_raw_parts(offsets, n + 1);
    let m = off[n] as usize;
    let graph = match Graph::from_csr(off, slice::from_raw_parts(targets, m), slice::from_raw_parts(weights, m)) {
        Ok(g) => g,
        Err(e) => return e.code(),
    };
    let engine = match Tunables::from_env().and_then(|t| BellmanFord::new(&graph, RayonScheduler::new(), t)) {
        Ok(bf) => bf,
        Err(e) => return e.code(),
    };
    let dist = slice::from_raw_parts_mut(out_dist, n);
    let (code, stats) = match engine.solve(source, variant) {
        Ok(sol) => {
            dist.copy_from_slice(&sol.distances);
            (0, sol.stats)
        }
        Err(BfError::NegativeCycle { distances, stats, .. }) => {
            dist.copy_from_slice(&distances);
            (-5, stats)
        }
        Err(e) => return e.code(),
    };
    if !info.is_null() { *info = BfResultInfo::from_stats(&stats, code); }
    code
}

#[no_mangle]
pub extern "C" fn bf_info_rounds(info: *const BfResultInfo) -> u32 {
    if info.is_null() { return 0; }
    unsafe { (*info).rounds }
}

/// Sum-scan of `n` values into `out` (`kind`: 0 forward exclusive, 1 forward
/// inclusive, 2 backward exclusive, 3 backward inclusive). Wraps on overflow.
///
/// # Safety
/// `xs` must point to `n` readable and `out` to `n` writable `i64`.
#[no_mangle]
pub unsafe extern "C" fn bf_scan_i64(xs: *const i64, n: usize, kind: i32, out: *mut i64) -> i32 {
    let Some(kind) = usize::try_from(kind).ok().and_then(|k| ScanKind::ALL.get(k).copied()) else { return -6 };
    if n == 0 { return 0; }
    if xs.is_null() || out.is_null() { return -3; }
    let res = scan(slice::from_raw_parts(xs, n), 0i64, |a, b| a.wrapping_add(*b), kind);
    slice::from_raw_parts_mut(out, n).copy_from_slice(&res);
    0
}
