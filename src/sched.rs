//! Scheduler capability consumed by the reducer and the solver.
//!
//! The core never spawns threads itself: parallelism is a two-way fork, a
//! bounded data-parallel loop and the cooperation triple
//! `should_call_communicate` / `reject` / `unblock`. Two implementations are
//! provided: rayon-backed work stealing and a deterministic sequential one
//! for tests.

use std::sync::atomic::{AtomicIsize, AtomicU64, Ordering};

use rayon::prelude::*;

use crate::error::Result;

/// Polls between two positive communicate signals.
pub const DEFAULT_HEARTBEAT: u32 = 8;

pub trait Scheduler: Sync {
    /// Runs both closures, possibly in parallel, and returns when both are done.
    fn fork2<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send;

    /// True when the running worker should offer work to the rest of the pool.
    fn should_call_communicate(&self) -> bool;

    /// The worker is about to run a long burst without polling.
    fn reject(&self);

    /// Ends the burst announced by the matching [`Scheduler::reject`].
    fn unblock(&self);

    fn parallel_for<F>(&self, lo: usize, hi: usize, body: F)
    where
        F: Fn(usize) + Sync + Send;

    /// Runs `f` inside the scheduler's worker pool.
    fn install<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        f()
    }
}

impl<S: Scheduler> Scheduler for &S {
    fn fork2<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        (**self).fork2(a, b)
    }
    fn should_call_communicate(&self) -> bool { (**self).should_call_communicate() }
    fn reject(&self) { (**self).reject() }
    fn unblock(&self) { (**self).unblock() }
    fn parallel_for<F>(&self, lo: usize, hi: usize, body: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        (**self).parallel_for(lo, hi, body)
    }
    fn install<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        (**self).install(f)
    }
}

/// Reject/unblock bookkeeping shared by both schedulers.
#[derive(Debug, Default)]
pub struct Cooperation { blocked: AtomicIsize, rejects: AtomicU64 }

impl Cooperation {
    #[inline] fn reject(&self) { self.rejects.fetch_add(1, Ordering::Relaxed); self.blocked.fetch_add(1, Ordering::AcqRel); }
    #[inline] fn unblock(&self) {
        let prev = self.blocked.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "unblock without matching reject");
    }
    /// Workers currently between `reject` and `unblock`.
    pub fn blocked(&self) -> isize { self.blocked.load(Ordering::Acquire) }
    pub fn rejects(&self) -> u64 { self.rejects.load(Ordering::Relaxed) }
}

/// Work-stealing scheduler on top of rayon.
///
/// rayon does not expose deque sizes, so the communicate signal is a
/// heartbeat counted per scheduler: every `heartbeat`-th poll, from any
/// worker, answers true, provided the pool has more than one worker.
#[derive(Debug)]
pub struct RayonScheduler { pool: Option<rayon::ThreadPool>, heartbeat: u32, polls: AtomicU64, coop: Cooperation }

impl Default for RayonScheduler {
    fn default() -> Self { Self::new() }
}

impl RayonScheduler {
    /// Uses the global rayon pool.
    pub fn new() -> Self { Self { pool: None, heartbeat: DEFAULT_HEARTBEAT, polls: AtomicU64::new(0), coop: Cooperation::default() } }

    /// Dedicated pool with `n` workers.
    pub fn with_threads(n: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(n).thread_name(|i| format!("bf-worker-{i}")).build()?;
        Ok(Self { pool: Some(pool), heartbeat: DEFAULT_HEARTBEAT, polls: AtomicU64::new(0), coop: Cooperation::default() })
    }

    pub fn with_heartbeat(mut self, polls: u32) -> Self { self.heartbeat = polls.max(1); self }

    pub fn num_threads(&self) -> usize {
        match &self.pool { Some(p) => p.current_num_threads(), None => rayon::current_num_threads() }
    }

    pub fn cooperation(&self) -> &Cooperation { &self.coop }
}

impl Scheduler for RayonScheduler {
    fn fork2<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        rayon::join(a, b)
    }

    fn should_call_communicate(&self) -> bool {
        if rayon::current_num_threads() <= 1 { return false; }
        (self.polls.fetch_add(1, Ordering::Relaxed) + 1) % self.heartbeat as u64 == 0
    }

    fn reject(&self) { self.coop.reject(); }
    fn unblock(&self) { self.coop.unblock(); }

    fn parallel_for<F>(&self, lo: usize, hi: usize, body: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        (lo..hi).into_par_iter().for_each(body);
    }

    fn install<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool { Some(p) => p.install(f), None => f() }
    }
}

/// Runs every fork branch in order on the calling thread.
///
/// With a heartbeat the communicate signal fires every `n`-th poll, which
/// makes the lazy frontier path fork at reproducible points.
#[derive(Debug, Default)]
pub struct SequentialScheduler { heartbeat: Option<u32>, polls: AtomicU64, coop: Cooperation }

impl SequentialScheduler {
    pub fn new() -> Self { Self::default() }
    pub fn with_heartbeat(polls: u32) -> Self { Self { heartbeat: Some(polls.max(1)), ..Self::default() } }
    pub fn cooperation(&self) -> &Cooperation { &self.coop }
}

impl Scheduler for SequentialScheduler {
    fn fork2<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        let ra = a();
        (ra, b())
    }

    fn should_call_communicate(&self) -> bool {
        match self.heartbeat {
            Some(hb) => (self.polls.fetch_add(1, Ordering::Relaxed) + 1) % hb as u64 == 0,
            None => false,
        }
    }

    fn reject(&self) { self.coop.reject(); }
    fn unblock(&self) { self.coop.unblock(); }

    fn parallel_for<F>(&self, lo: usize, hi: usize, body: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        (lo..hi).for_each(body);
    }
}
