use bf_core::{reduce, scan, Reducer, ScanKind, SequentialScheduler};

fn main() {
    let xs = [1i64, 3, 9, 0, 33, 1, 1];
    println!("xs = {xs:?}");
    println!("sum = {}", reduce(&xs, 0, |a, b| a + b));
    for kind in ScanKind::ALL { println!("{kind:?} = {:?}", scan(&xs, 0, |a, b| a + b, kind)); }

    // Weighted split: the heavy first item ends up alone in its half.
    let s = SequentialScheduler::new();
    let r = Reducer::with_cutoff(&s, 4);
    let items = [90u64, 1, 2, 3, 4];
    println!("weights = {:?}", r.weights(&items, |x| *x));
    println!("weighted max = {}", r.reduce_weighted(&items, 0, u64::max, |x| *x));
}
