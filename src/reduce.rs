//! Granularity-controlled divide and conquer.
//!
//! [`reduce_input`] is the one recursion every parallel piece of the crate
//! goes through: a [`Splittable`] input heavier than the cutoff is halved and
//! both halves are forked, the right one into a fresh identity output, and
//! the two outputs are combined after the join. Array reduction, the scan's
//! upward pass and frontier layer processing are all instances of it.

use crate::config::Tunables;
use crate::error::Result;
use crate::partition::balanced_mid;
use crate::sched::{RayonScheduler, Scheduler};

/// A workload that can be measured and cut in two.
pub trait Splittable: Sized + Send {
    /// Proxy for the remaining work.
    fn weight(&self) -> usize;

    fn can_split(&self, cutoff: usize) -> bool { self.weight() > cutoff }

    /// Keeps the left part in `self` and returns the right part.
    fn split(&mut self) -> Self;
}

/// Runs `convert` sequentially on pieces no heavier than `cutoff` and merges
/// sibling outputs with `combine(left, right)`. Returns the number of forks.
pub fn reduce_input<S, I, O, Id, Comb, Conv>(
    sched: &S,
    cutoff: usize,
    input: I,
    out: &mut O,
    identity: &Id,
    combine: &Comb,
    convert: &Conv,
) -> usize
where
    S: Scheduler,
    I: Splittable,
    O: Send,
    Id: Fn() -> O + Sync,
    Comb: Fn(&mut O, O) + Sync,
    Conv: Fn(I, &mut O) + Sync,
{
    if !input.can_split(cutoff) {
        convert(input, out);
        return 0;
    }
    let mut left = input;
    let right = left.split();
    let mut out2 = identity();
    let out_left: &mut O = &mut *out;
    let out_right = &mut out2;
    let (fl, fr) = sched.fork2(
        move || reduce_input(sched, cutoff, left, out_left, identity, combine, convert),
        move || reduce_input(sched, cutoff, right, out_right, identity, combine, convert),
    );
    combine(out, out2);
    1 + fl + fr
}

/// How a range is weighed for splitting.
#[derive(Debug, Clone, Copy)]
pub enum WeightModel<'w> {
    /// Every element weighs one.
    Uniform,
    /// `pref[i]` is the total weight of elements before `i` (length n + 1).
    Prefix(&'w [u64]),
}

/// Index range `[lo, hi)` over an array.
#[derive(Debug, Clone, Copy)]
pub struct RangeInput<'w> { pub lo: usize, pub hi: usize, model: WeightModel<'w> }

impl<'w> RangeInput<'w> {
    pub fn uniform(n: usize) -> Self { Self { lo: 0, hi: n, model: WeightModel::Uniform } }

    /// An empty prefix is an empty uniform range.
    pub fn weighted(pref: &'w [u64]) -> Self {
        if pref.is_empty() { return Self::uniform(0); }
        Self { lo: 0, hi: pref.len() - 1, model: WeightModel::Prefix(pref) }
    }

    #[inline] pub fn len(&self) -> usize { self.hi - self.lo }
    #[inline] pub fn is_empty(&self) -> bool { self.hi == self.lo }
}

impl<'w> Splittable for RangeInput<'w> {
    fn weight(&self) -> usize {
        match self.model {
            WeightModel::Uniform => self.len(),
            WeightModel::Prefix(p) => p[self.hi].saturating_sub(p[self.lo]) as usize,
        }
    }

    // A single element is atomically small whatever it weighs.
    fn can_split(&self, cutoff: usize) -> bool { self.len() > 1 && self.weight() > cutoff }

    fn split(&mut self) -> Self {
        let mid = match self.model {
            WeightModel::Uniform => self.lo + self.len() / 2,
            // Non-monotone prefixes still land on a deterministic interior point.
            WeightModel::Prefix(p) => balanced_mid(p, self.lo, self.hi),
        };
        let right = Self { lo: mid, hi: self.hi, model: self.model };
        self.hi = mid;
        right
    }
}

/// Array skeleton bound to a scheduler and a sequential cutoff.
#[derive(Debug)]
pub struct Reducer<'s, S: Scheduler> { pub(crate) sched: &'s S, pub(crate) cutoff: usize }

impl<'s, S: Scheduler> Reducer<'s, S> {
    pub fn new(sched: &'s S, tunables: &Tunables) -> Result<Self> {
        tunables.validate()?;
        Ok(Self { sched, cutoff: tunables.array_cutoff })
    }

    pub fn with_cutoff(sched: &'s S, cutoff: usize) -> Self { Self { sched, cutoff: cutoff.max(1) } }

    pub fn cutoff(&self) -> usize { self.cutoff }

    /// Combines `lift(i, &xs[i])` over the whole array, left to right.
    pub fn map_reduce<T, R, C, L>(&self, xs: &[T], id: R, combine: C, lift: L) -> R
    where
        T: Sync,
        R: Clone + Send + Sync,
        C: Fn(R, R) -> R + Sync,
        L: Fn(usize, &T) -> R + Sync,
    {
        self.sched.install(|| self.fold(RangeInput::uniform(xs.len()), xs, id, &combine, &lift))
    }

    pub fn reduce<T, C>(&self, xs: &[T], id: T, combine: C) -> T
    where
        T: Clone + Send + Sync,
        C: Fn(T, T) -> T + Sync,
    {
        self.map_reduce(xs, id, combine, |_, x: &T| x.clone())
    }

    /// Like [`Reducer::reduce`] but splits so each half carries about the same
    /// total `item_weight`, not the same element count.
    pub fn reduce_weighted<T, C, W>(&self, xs: &[T], id: T, combine: C, item_weight: W) -> T
    where
        T: Clone + Send + Sync,
        C: Fn(T, T) -> T + Sync,
        W: Fn(&T) -> u64 + Sync,
    {
        let pref = self.weights(xs, item_weight);
        let lift = |_: usize, x: &T| x.clone();
        self.sched.install(|| self.fold(RangeInput::weighted(&pref), xs, id, &combine, &lift))
    }

    /// Prefix sums of `item_weight` (length `xs.len() + 1`, starting at 0).
    pub fn weights<T, W>(&self, xs: &[T], item_weight: W) -> Vec<u64>
    where
        T: Sync,
        W: Fn(&T) -> u64 + Sync,
    {
        let ws: Vec<u64> = xs.iter().map(&item_weight).collect();
        let mut pref = Vec::with_capacity(xs.len() + 1);
        pref.push(0);
        pref.extend(self.scan(&ws, 0u64, |a, b| a + b, crate::scan::ScanKind::ForwardInclusive));
        pref
    }

    fn fold<T, R, C, L>(&self, input: RangeInput<'_>, xs: &[T], id: R, combine: &C, lift: &L) -> R
    where
        T: Sync,
        R: Clone + Send + Sync,
        C: Fn(R, R) -> R + Sync,
        L: Fn(usize, &T) -> R + Sync,
    {
        let identity = || id.clone();
        let merge = |acc: &mut R, right: R| {
            let left = std::mem::replace(acc, id.clone());
            *acc = combine(left, right);
        };
        let convert = |piece: RangeInput<'_>, acc: &mut R| {
            let mut r = std::mem::replace(acc, id.clone());
            for i in piece.lo..piece.hi { r = combine(r, lift(i, &xs[i])); }
            *acc = r;
        };
        let mut out = id.clone();
        let forks = reduce_input(self.sched, self.cutoff, input, &mut out, &identity, &merge, &convert);
        tracing::trace!(n = xs.len(), forks, "reduce");
        out
    }
}

/// [`Reducer::reduce`] on the global rayon pool with the default cutoff.
pub fn reduce<T, C>(xs: &[T], id: T, combine: C) -> T
where
    T: Clone + Send + Sync,
    C: Fn(T, T) -> T + Sync,
{
    let sched = RayonScheduler::new();
    Reducer::with_cutoff(&sched, Tunables::default().array_cutoff).reduce(xs, id, combine)
}
