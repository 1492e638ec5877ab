use std::collections::HashMap;
use std::sync::LazyLock;

use itertools::iproduct;
use num::{BigUint, One, Zero};
use parking_lot::Mutex;

use crate::combinatorics::{choose, factorial, group_partitions};

static SHARED_TABLE: LazyLock<Mutex<StirlingTable>> =
    LazyLock::new(|| Mutex::new(StirlingTable::new()));

/// Memo of cycle-restricted Stirling numbers of the first kind, keyed by `(n, m, r)`.
///
/// Entries are filled lazily and never evicted. Every entry is a pure function of its
/// key, so a table can be dropped and rebuilt at any time.
#[derive(Debug, Default, Clone)]
pub struct StirlingTable {
    counts: HashMap<(usize, usize, usize), BigUint>,
}

impl StirlingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of permutations of `n` elements into exactly `m` cycles, each of length at
    /// least `r`. A minimum length of zero is the same as one.
    ///
    /// The table is filled bottom-up over every `(n', m') <= (n, m)` for this `r`, so the
    /// recurrence
    ///
    /// ```text
    /// S(n, m, r) = (n - 1) S(n - 1, m, r) + C(n - 1, r - 1) (r - 1)! S(n - r, m - 1, r)
    /// ```
    ///
    /// never recurses on the call stack.
    pub fn count(&mut self, n: usize, m: usize, r: usize) -> BigUint {
        let r = r.max(1);
        if let Some(count) = self.lookup(n, m, r) {
            return count;
        }

        // Cyclic orders of a fresh cycle of minimal length.
        let orders = factorial(r - 1);
        for (n1, m1) in iproduct!(1..=n, 1..=m) {
            if boundary(n1, m1, r).is_some() || self.counts.contains_key(&(n1, m1, r)) {
                continue;
            }
            let extend = self.lookup(n1 - 1, m1, r).unwrap_or_default() * (n1 - 1);
            let open = choose(n1 - 1, r - 1)
                * &orders
                * self.lookup(n1 - r, m1 - 1, r).unwrap_or_default();
            self.counts.insert((n1, m1, r), extend + open);
        }

        self.lookup(n, m, r).unwrap_or_default()
    }

    /// Number of permutations of `n` elements into `m` cycles where exactly `v` cycles
    /// have length `k` and every other cycle is longer than `k`.
    pub fn partial_type(&mut self, n: usize, m: usize, k: usize, v: usize) -> BigUint {
        let moved = k * v;
        if k == 0 || moved > n || v > m {
            return BigUint::zero();
        }
        let rest = self.count(n - moved, m - v, k + 1);
        if rest.is_zero() {
            return rest;
        }
        choose(n, moved)
            * group_partitions(v, k)
            * num::pow(factorial(k - 1), v)
            * rest
    }

    fn lookup(&self, n: usize, m: usize, r: usize) -> Option<BigUint> {
        boundary(n, m, r).or_else(|| self.counts.get(&(n, m, r)).cloned())
    }
}

/// Values of `S(n, m, r)` that need no recurrence.
fn boundary(n: usize, m: usize, r: usize) -> Option<BigUint> {
    if n == 0 && m == 0 {
        Some(BigUint::one())
    } else if n == 0 || m == 0 || n < r.saturating_mul(m) {
        Some(BigUint::zero())
    } else {
        None
    }
}

/// Run `f` against the process-wide table while holding its lock.
///
/// The lock is not re-entrant: `f` must use the table it is given and never call
/// [`stirling1st`] or anything else that locks the shared table.
pub(crate) fn with_shared_table<T>(f: impl FnOnce(&mut StirlingTable) -> T) -> T {
    let mut table = SHARED_TABLE.lock();
    f(&mut table)
}

/// Count of permutations of `n` elements into exactly `m` cycles of length at least `r`.
pub fn stirling1st(n: usize, m: usize, r: usize) -> BigUint {
    with_shared_table(|table| table.count(n, m, r))
}

/// Count of permutations of `n` elements into `m` cycles, exactly `v` of which have
/// length `k` while the rest are longer.
pub fn stirling1st_partial_type(n: usize, m: usize, k: usize, v: usize) -> BigUint {
    with_shared_table(|table| table.partial_type(n, m, k, v))
}
