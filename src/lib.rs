//! Counting, unranking and uniform sampling of permutations with a constrained cycle
//! structure.
//!
//! Counts come from cycle-restricted Stirling numbers of the first kind, memoized in a
//! [`StirlingTable`]. A rank is decomposed into a [`CycleType`] whose blocks are then
//! instantiated with subset, grouping and cyclic-order unrankers.

pub mod combinatorics;
pub mod cycle_type;
pub mod derangement;
pub mod error;
pub mod stirling;
pub mod unrank;

pub use combinatorics::{choose, factorial, periodic_choose};
pub use cycle_type::{CycleBlock, CycleType, reconstruct_type};
pub use derangement::{
    DerangementIndexer, count_derangements, random_cycle_permutation,
    random_cycle_permutation_with_rng, random_derangement, random_derangement_with_rng,
    unrank_cycle_permutation, unrank_derangement,
};
pub use error::UnrankError;
pub use stirling::{StirlingTable, stirling1st, stirling1st_partial_type};
