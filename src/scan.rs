//! Two-pass parallel scan.
//!
//! The upward pass is an ordinary [`reduce_input`] whose output is a
//! balanced tree of partial sums mirroring the split shape; the downward
//! pass walks that tree with forks, handing each subtree the combination of
//! everything on its "before" side.

use serde::{Deserialize, Serialize};

use crate::config::Tunables;
use crate::reduce::{reduce_input, RangeInput, Reducer};
use crate::sched::{RayonScheduler, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanKind {
    /// `out[i] = xs[0] ⊕ … ⊕ xs[i-1]`
    ForwardExclusive,
    /// `out[i] = xs[0] ⊕ … ⊕ xs[i]`
    ForwardInclusive,
    /// `out[i] = xs[i+1] ⊕ … ⊕ xs[n-1]`
    BackwardExclusive,
    /// `out[i] = xs[i] ⊕ … ⊕ xs[n-1]`
    BackwardInclusive,
}

impl ScanKind {
    pub const ALL: [ScanKind; 4] = [ScanKind::ForwardExclusive, ScanKind::ForwardInclusive, ScanKind::BackwardExclusive, ScanKind::BackwardInclusive];
    #[inline] pub fn is_forward(self) -> bool { matches!(self, ScanKind::ForwardExclusive | ScanKind::ForwardInclusive) }
    #[inline] pub fn is_inclusive(self) -> bool { matches!(self, ScanKind::ForwardInclusive | ScanKind::BackwardInclusive) }
}

enum SumTree<T> {
    Empty,
    Leaf { lo: usize, hi: usize, sum: T },
    Node { lo: usize, hi: usize, sum: T, left: Box<SumTree<T>>, right: Box<SumTree<T>> },
}

impl<T> SumTree<T> {
    fn bounds(&self) -> (usize, usize) {
        match self { SumTree::Empty => (0, 0), SumTree::Leaf { lo, hi, .. } | SumTree::Node { lo, hi, .. } => (*lo, *hi) }
    }
    fn sum(&self) -> Option<&T> {
        match self { SumTree::Empty => None, SumTree::Leaf { sum, .. } | SumTree::Node { sum, .. } => Some(sum) }
    }
}

fn leaf_scan<T, C>(xs: &[T], out: &mut [T], offset: T, kind: ScanKind, combine: &C)
where
    T: Clone,
    C: Fn(&T, &T) -> T,
{
    let mut acc = offset;
    let inclusive = kind.is_inclusive();
    let mut step = |i: usize, acc: &mut T, fwd: bool| {
        if !inclusive { out[i] = acc.clone(); }
        *acc = if fwd { combine(acc, &xs[i]) } else { combine(&xs[i], acc) };
        if inclusive { out[i] = acc.clone(); }
    };
    if kind.is_forward() {
        for i in 0..xs.len() { step(i, &mut acc, true); }
    } else {
        for i in (0..xs.len()).rev() { step(i, &mut acc, false); }
    }
}

fn distribute<S, T, C>(sched: &S, tree: &SumTree<T>, offset: T, xs: &[T], out: &mut [T], kind: ScanKind, combine: &C)
where
    S: Scheduler,
    T: Clone + Send + Sync,
    C: Fn(&T, &T) -> T + Sync,
{
    match tree {
        SumTree::Empty => {}
        SumTree::Leaf { lo, hi, .. } => leaf_scan(&xs[*lo..*hi], out, offset, kind, combine),
        SumTree::Node { left, right, .. } => {
            let (llo, lhi) = left.bounds();
            let (out_l, out_r) = out.split_at_mut(lhi - llo);
            let (off_l, off_r) = match (kind.is_forward(), left.sum(), right.sum()) {
                (true, Some(ls), _) => { let r = combine(&offset, ls); (offset, r) }
                (false, _, Some(rs)) => (combine(rs, &offset), offset),
                _ => (offset.clone(), offset),
            };
            sched.fork2(
                || distribute(sched, left, off_l, xs, out_l, kind, combine),
                || distribute(sched, right, off_r, xs, out_r, kind, combine),
            );
        }
    }
}

impl<'s, S: Scheduler> Reducer<'s, S> {
    /// Scans `xs` under the associative `combine` with identity `id`.
    pub fn scan<T, C>(&self, xs: &[T], id: T, combine: C, kind: ScanKind) -> Vec<T>
    where
        T: Clone + Send + Sync,
        C: Fn(&T, &T) -> T + Sync,
    {
        self.sched.install(|| {
            let identity = || SumTree::Empty;
            let merge = |acc: &mut SumTree<T>, right: SumTree<T>| {
                let left = std::mem::replace(acc, SumTree::Empty);
                *acc = match (left.sum(), right.sum()) {
                    (None, _) => right,
                    (_, None) => left,
                    (Some(ls), Some(rs)) => {
                        let sum = combine(ls, rs);
                        let (lo, hi) = (left.bounds().0, right.bounds().1);
                        SumTree::Node { lo, hi, sum, left: Box::new(left), right: Box::new(right) }
                    }
                };
            };
            let convert = |piece: RangeInput<'_>, acc: &mut SumTree<T>| {
                let sum = xs[piece.lo..piece.hi].iter().fold(id.clone(), |a, x| combine(&a, x));
                *acc = SumTree::Leaf { lo: piece.lo, hi: piece.hi, sum };
            };
            let mut tree = SumTree::Empty;
            reduce_input(self.sched, self.cutoff, RangeInput::uniform(xs.len()), &mut tree, &identity, &merge, &convert);
            let mut out = vec![id.clone(); xs.len()];
            distribute(self.sched, &tree, id.clone(), xs, &mut out, kind, &combine);
            out
        })
    }
}

/// [`Reducer::scan`] on the global rayon pool with the default cutoff.
pub fn scan<T, C>(xs: &[T], id: T, combine: C, kind: ScanKind) -> Vec<T>
where
    T: Clone + Send + Sync,
    C: Fn(&T, &T) -> T + Sync,
{
    let sched = RayonScheduler::new();
    Reducer::with_cutoff(&sched, Tunables::default().array_cutoff).scan(xs, id, combine, kind)
}
