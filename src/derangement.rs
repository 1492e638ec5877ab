use num::bigint::RandBigInt;
use num::{BigUint, Integer, Zero};
use rand::Rng;

use crate::combinatorics::{choose, factorial, group_partitions};
use crate::cycle_type::{CycleBlock, reconstruct_type};
use crate::error::{UnrankError, check_rank};
use crate::stirling::{StirlingTable, with_shared_table};
use crate::unrank::{filtering_out, unrank_choose, unrank_cyclic_permute, unrank_periodic_choose};

/// Number of permutations of `n` elements that move exactly `m` of them and fix the rest.
pub fn count_derangements(n: usize, m: usize) -> BigUint {
    with_shared_table(|table| moved_count(table, n, m))
}

fn moved_count(table: &mut StirlingTable, n: usize, m: usize) -> BigUint {
    if m > n {
        return BigUint::zero();
    }
    choose(n, m) * full_derangements(table, m)
}

/// Fixed-point-free permutations of `m` elements, summed over their cycle counts.
fn full_derangements(table: &mut StirlingTable, m: usize) -> BigUint {
    (0..=m / 2).map(|cycles| table.count(m, cycles, 2)).sum()
}

/// Write the permutation with the given rank among the `stirling1st(pool.len(), cycles, 2)`
/// fixed-point-free permutations of `pool` into `ps`.
///
/// Each block is instantiated shortest cycles first. Its rank is split into the choice of
/// elements from the pool, their grouping into cycles, and one cyclic order per group.
fn place_cycles(
    table: &mut StirlingTable,
    ps: &mut [usize],
    mut pool: Vec<usize>,
    cycles: usize,
    rank: &BigUint,
) -> Result<(), UnrankError> {
    for block in reconstruct_type(table, pool.len(), cycles, 2, rank)? {
        let CycleBlock {
            length,
            multiplicity,
            rank,
        } = block;
        let size = length * multiplicity;

        let (rank, subset) = rank.div_rem(&choose(pool.len(), size));
        let members = unrank_choose(&pool, size, &subset);
        let (mut rank, grouping) = rank.div_rem(&group_partitions(multiplicity, length));
        let orders = factorial(length - 1);
        for group in unrank_periodic_choose(&members, length, &grouping) {
            let (outer, order) = rank.div_rem(&orders);
            for (&a, b) in group.iter().zip(unrank_cyclic_permute(&group, &order)) {
                ps[a] = b;
            }
            rank = outer;
        }
        debug_assert!(rank.is_zero());

        pool = filtering_out(&pool, &members);
    }
    Ok(())
}

fn apply<T: Clone>(values: &[T], ps: &[usize]) -> Vec<T> {
    ps.iter().map(|&p| values[p].clone()).collect()
}

fn unrank_moved<T: Clone>(
    table: &mut StirlingTable,
    values: &[T],
    m: usize,
    rank: &BigUint,
) -> Result<Vec<T>, UnrankError> {
    let n = values.len();
    check_rank(n, m, rank, &moved_count(table, n, m))?;

    let (mut rank, subset) = rank.div_rem(&choose(n, m));
    let positions: Vec<usize> = (0..n).collect();
    let moved = unrank_choose(&positions, m, &subset);

    let mut cycles = 0;
    loop {
        let share = table.count(m, cycles, 2);
        if rank < share {
            break;
        }
        rank -= share;
        cycles += 1;
    }

    let mut ps = positions;
    place_cycles(table, &mut ps, moved, cycles, &rank)?;
    Ok(apply(values, &ps))
}

/// Permute `values` by the permutation with the given rank among those moving exactly `m`
/// elements.
///
/// The rank is read as a choice of the moved positions, then a cycle count, then a
/// fixed-point-free permutation of the moved positions with that many cycles. Rank `0` of
/// `m = 0` is the identity.
///
/// # Errors
///
/// [`UnrankError::EmptySpace`] if no permutation moves exactly `m` elements (e.g. `m = 1`
/// or `m > values.len()`), [`UnrankError::RankOutOfRange`] if `rank` is not below
/// [`count_derangements`].
pub fn unrank_derangement<T: Clone>(
    values: &[T],
    m: usize,
    rank: &BigUint,
) -> Result<Vec<T>, UnrankError> {
    with_shared_table(|table| unrank_moved(table, values, m, rank))
}

/// Permute `values` by the permutation with the given rank among the
/// `stirling1st(values.len(), cycles, 2)` fixed-point-free permutations with exactly
/// `cycles` cycles.
pub fn unrank_cycle_permutation<T: Clone>(
    values: &[T],
    cycles: usize,
    rank: &BigUint,
) -> Result<Vec<T>, UnrankError> {
    with_shared_table(|table| {
        let pool: Vec<usize> = (0..values.len()).collect();
        let mut ps = pool.clone();
        place_cycles(table, &mut ps, pool, cycles, rank)?;
        Ok(apply(values, &ps))
    })
}

/// Uniformly random permutation of `0..n` moving exactly `m` elements.
pub fn random_derangement(n: usize, m: usize) -> Result<Vec<usize>, UnrankError> {
    random_derangement_with_rng(&mut rand::thread_rng(), n, m)
}

pub fn random_derangement_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    m: usize,
) -> Result<Vec<usize>, UnrankError> {
    DerangementIndexer::new(n, m).sample(rng)
}

/// Uniformly random fixed-point-free permutation of `0..n` with exactly `cycles` cycles.
pub fn random_cycle_permutation(n: usize, cycles: usize) -> Result<Vec<usize>, UnrankError> {
    random_cycle_permutation_with_rng(&mut rand::thread_rng(), n, cycles)
}

pub fn random_cycle_permutation_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    cycles: usize,
) -> Result<Vec<usize>, UnrankError> {
    let total = with_shared_table(|table| table.count(n, cycles, 2));
    if total.is_zero() {
        return Err(UnrankError::EmptySpace { n, m: cycles });
    }
    let rank = rng.gen_biguint_below(&total);
    let identity: Vec<usize> = (0..n).collect();
    unrank_cycle_permutation(&identity, cycles, &rank)
}

/// Bijection between `0..total()` and the permutations of `n` elements that move exactly
/// `m` of them.
#[derive(Clone, Debug)]
pub struct DerangementIndexer {
    n: usize,
    m: usize,
    total: BigUint,
}

impl DerangementIndexer {
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            n,
            m,
            total: count_derangements(n, m),
        }
    }

    pub fn total(&self) -> &BigUint {
        &self.total
    }

    /// Convert an index into the permutation of `0..n` it denotes.
    pub fn index_to_permutation(&self, index: &BigUint) -> Result<Vec<usize>, UnrankError> {
        let identity: Vec<usize> = (0..self.n).collect();
        self.permute(&identity, index)
    }

    /// Apply the permutation with the given index to `values`.
    pub fn permute<T: Clone>(&self, values: &[T], index: &BigUint) -> Result<Vec<T>, UnrankError> {
        if values.len() != self.n {
            return Err(UnrankError::LengthMismatch {
                expected: self.n,
                found: values.len(),
            });
        }
        unrank_derangement(values, self.m, index)
    }

    /// Draw a permutation uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<usize>, UnrankError> {
        if self.total.is_zero() {
            return Err(UnrankError::EmptySpace {
                n: self.n,
                m: self.m,
            });
        }
        let index = rng.gen_biguint_below(&self.total);
        self.index_to_permutation(&index)
    }

    /// Every permutation of the space, in index order.
    pub fn iter(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        num::range(BigUint::zero(), self.total.clone()).map(move |index| {
            self.index_to_permutation(&index)
                .expect("every index below the total unranks")
        })
    }
}
