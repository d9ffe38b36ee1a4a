//! Static zig-zag assignment of base indices to workers.
//!
//! Examining base index `k` costs work proportional to `n - k` (only
//! higher-indexed partners are tested, so no pair is checked twice). A plain
//! ascending stripe would pile the expensive low indices onto low ranks;
//! alternating the stripe direction every iteration evens the cumulative cost
//! across ranks.

/// Base indices that `rank` (of `worker_count` workers) must examine for a
/// population of `n` particles.
///
/// Iteration `i` assigns `i*worker_count + rank` when `i` is even and
/// `(i+1)*worker_count - rank - 1` when `i` is odd, for as long as the result
/// stays below `n`. The layout is identical every round. Across all ranks the
/// assignments cover `0..n` exactly once.
pub fn assignments(worker_count: usize, rank: usize, n: usize) -> Vec<usize> {
    debug_assert!(worker_count > 0);
    debug_assert!(rank < worker_count);

    let mut bases = Vec::with_capacity(n / worker_count + 1);
    let mut i = 0usize;
    while i * worker_count < n {
        let base = if i % 2 == 0 {
            i * worker_count + rank
        } else {
            (i + 1) * worker_count - rank - 1
        };
        if base < n {
            bases.push(base);
        }
        i += 1;
    }
    bases
}
