use num::{BigUint, Integer};

use crate::error::{UnrankError, check_rank};
use crate::stirling::StirlingTable;

/// `multiplicity` disjoint cycles of exactly `length` elements each.
///
/// `rank` selects one way of instantiating the block from the elements still unplaced:
/// which elements take part, how they are grouped and how each group is cyclically ordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleBlock {
    pub length: usize,
    pub multiplicity: usize,
    pub rank: BigUint,
}

/// Cycle blocks ordered by strictly increasing length.
pub type CycleType = Vec<CycleBlock>;

/// Find the shortest cycle length `k >= r` of the permutation with the given rank among
/// the `stirling1st(n, m, r)` permutations of `n` elements into `m` cycles.
///
/// Ranks below `S(n, m, k + 1)` belong to permutations whose cycles are all longer than
/// `k`, so the rank is returned relative to that offset.
///
/// # Panics
///
/// Panics if `m` is zero. [`reconstruct_type`] only calls this while cycles remain.
pub(crate) fn bisect_cycle_length(
    table: &mut StirlingTable,
    n: usize,
    m: usize,
    r: usize,
    rank: &BigUint,
) -> (usize, BigUint) {
    debug_assert!(m > 0);
    let (mut lo, mut hi) = (r, n / m + 1);
    while lo < hi {
        let mid = (lo + hi) / 2;
        if *rank < table.count(n, m, mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    let k = lo - 1;
    (k, rank - table.count(n, m, k + 1))
}

/// Find how many cycles of the shortest length `k` the ranked permutation has.
///
/// Returns the multiplicity together with the rank inside its share, or `None` if the rank
/// lies past every share.
pub fn find_cycle_amount(
    table: &mut StirlingTable,
    n: usize,
    m: usize,
    k: usize,
    rank: &BigUint,
) -> Option<(usize, BigUint)> {
    let mut rank = rank.clone();
    for v in 1..=n.checked_div(k)? {
        let share = table.partial_type(n, m, k, v);
        if rank < share {
            return Some((v, rank));
        }
        rank -= share;
    }
    None
}

/// Decompose a rank of the `stirling1st(n, m, r)` space into its cycle type.
pub fn reconstruct_type(
    table: &mut StirlingTable,
    n: usize,
    m: usize,
    r: usize,
    rank: &BigUint,
) -> Result<CycleType, UnrankError> {
    let total = table.count(n, m, r);
    check_rank(n, m, rank, &total)?;

    let (mut n, mut m, mut r) = (n, m, r);
    let mut rank = rank.clone();
    let mut blocks = CycleType::new();
    while m > 0 {
        let (k, local) = bisect_cycle_length(table, n, m, r, &rank);
        let (v, local) = find_cycle_amount(table, n, m, k, &local).ok_or_else(|| {
            UnrankError::RankOutOfRange {
                rank: rank.clone(),
                total: total.clone(),
            }
        })?;
        let (block_rank, rest) = local.div_rem(&table.count(n - k * v, m - v, k + 1));
        blocks.push(CycleBlock {
            length: k,
            multiplicity: v,
            rank: block_rank,
        });
        n -= k * v;
        m -= v;
        r = k + 1;
        rank = rest;
    }
    debug_assert_eq!(n, 0);
    Ok(blocks)
}
