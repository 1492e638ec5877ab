use num::{BigUint, Zero};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnrankError {
    /// No permutation satisfies the requested constraints, so there is nothing to unrank
    /// or sample.
    #[error("no permutation of {n} elements satisfies the constraint {m}")]
    EmptySpace { n: usize, m: usize },
    /// The rank is not below the size of its space.
    #[error("rank {rank} is out of range for a space of {total} permutations")]
    RankOutOfRange { rank: BigUint, total: BigUint },
    /// The values to permute do not match the number of elements of the space.
    #[error("expected {expected} values, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Check that `rank` is a member of a space of `total` permutations of `n` elements.
pub(crate) fn check_rank(
    n: usize,
    m: usize,
    rank: &BigUint,
    total: &BigUint,
) -> Result<(), UnrankError> {
    if total.is_zero() {
        return Err(UnrankError::EmptySpace { n, m });
    }
    if rank >= total {
        return Err(UnrankError::RankOutOfRange {
            rank: rank.clone(),
            total: total.clone(),
        });
    }
    Ok(())
}
