use std::collections::HashSet;
use std::hash::Hash;

use num::{BigUint, Integer, ToPrimitive, Zero};

use crate::combinatorics::choose;

/// Decode `rank` into the `rank`-th `k`-subset of `xs` in the combinatorial number system.
///
/// Elements are scanned left to right. An element is skipped when the rank is at least the
/// number of subsets that still fit in the suffix after it, in which case that number is
/// subtracted from the rank. Selected elements keep their order in `xs`.
///
/// `rank` must be below `choose(xs.len(), k)`.
pub fn unrank_choose<T: Clone>(xs: &[T], k: usize, rank: &BigUint) -> Vec<T> {
    let mut rank = rank.clone();
    let mut selected = Vec::with_capacity(k);
    for (j, x) in xs.iter().enumerate() {
        let Some(still_needed) = k.checked_sub(selected.len() + 1) else {
            break;
        };
        let skipped = choose(xs.len() - j - 1, still_needed);
        if rank >= skipped {
            rank -= skipped;
        } else {
            selected.push(x.clone());
        }
    }
    debug_assert!(rank.is_zero());
    selected
}

/// Decode `rank` into a partition of `xs` into unordered groups of `k` elements.
///
/// Each group is anchored on the first element not yet grouped, so groups come out ordered
/// by their first element. `rank` must be below `periodic_choose(xs.len(), k)`.
///
/// # Panics
///
/// Panics if `k` is zero or does not divide `xs.len()`.
pub fn unrank_periodic_choose<T>(xs: &[T], k: usize, rank: &BigUint) -> Vec<Vec<T>>
where
    T: Clone + Eq + Hash,
{
    assert!(
        k > 0 && xs.len() % k == 0,
        "{} elements cannot be split into groups of {k}",
        xs.len()
    );

    let mut rest = xs.to_vec();
    let mut rank = rank.clone();
    let mut groups = Vec::with_capacity(xs.len() / k);
    while !rest.is_empty() {
        let (outer, inner) = rank.div_rem(&choose(rest.len() - 1, k - 1));
        let group = unrank_choose(&rest, k, &inner);
        rest = filtering_out(&rest, &group);
        groups.push(group);
        rank = outer;
    }
    groups
}

/// Decode `rank` in `[0, (xs.len() - 1)!)` into a single cycle over `xs`.
///
/// Runs Sattolo's shuffle with the swap targets read from the factorial digits of `rank`
/// instead of drawn at random. Position `a` of the result holds the element that `xs[a]`
/// maps to.
pub fn unrank_cyclic_permute<T: Clone>(xs: &[T], rank: &BigUint) -> Vec<T> {
    let mut ys = xs.to_vec();
    let mut rank = rank.clone();
    for k in (1..ys.len()).rev() {
        let (outer, digit) = rank.div_rem(&BigUint::from(k));
        let j = digit.to_usize().expect("remainder is smaller than the divisor");
        ys.swap(k, j);
        rank = outer;
    }
    debug_assert!(rank.is_zero());
    ys
}

/// `xs` without the elements of `ys`, order preserved.
pub fn filtering_out<T>(xs: &[T], ys: &[T]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let removed: HashSet<&T> = ys.iter().collect();
    xs.iter().filter(|x| !removed.contains(x)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinatorics::{factorial, periodic_choose};
    use insta::assert_debug_snapshot;
    use itertools::Itertools;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    /// Inverse of [`unrank_choose`] over positions `0..n`.
    fn rank_choose(n: usize, indices: &[usize]) -> BigUint {
        let k = indices.len();
        let mut rank = BigUint::zero();
        for (i, &c) in indices.iter().enumerate() {
            let start = if i == 0 { 0 } else { indices[i - 1] + 1 };
            for j in start..c {
                rank += choose(n - j - 1, k - i - 1);
            }
        }
        rank
    }

    fn ranks(total: &BigUint) -> impl Iterator<Item = BigUint> {
        num::range(BigUint::zero(), total.clone())
    }

    #[test]
    fn subsets_of_letters() {
        let xs = ['a', 'b', 'c', 'd'];
        let subsets: Vec<String> = ranks(&choose(4, 2))
            .map(|i| unrank_choose(&xs, 2, &i).into_iter().collect())
            .collect();
        assert_debug_snapshot!(subsets, @r#"
        [
            "ab",
            "ac",
            "ad",
            "bc",
            "bd",
            "cd",
        ]
        "#);
    }

    #[test]
    fn first_and_last_subsets() {
        let xs = [0, 1, 2, 3, 4];
        assert_eq!(unrank_choose(&xs, 2, &BigUint::zero()), vec![0, 1]);
        assert_eq!(unrank_choose(&xs, 2, &BigUint::from(9u32)), vec![3, 4]);
        assert_eq!(unrank_choose(&xs, 0, &BigUint::zero()), Vec::<i32>::new());
        assert_eq!(unrank_choose(&xs, 5, &BigUint::zero()), xs.to_vec());
    }

    #[test]
    fn subset_decoding_matches_lexicographic_combinations() {
        let xs: Vec<usize> = (0..7).collect();
        for k in 0..=7 {
            let expected: Vec<Vec<usize>> = xs.iter().copied().combinations(k).collect();
            let decoded: Vec<Vec<usize>> =
                ranks(&choose(7, k)).map(|i| unrank_choose(&xs, k, &i)).collect();
            assert_eq!(decoded, expected);
        }
    }

    #[test]
    fn rank_choose_inverts_unrank_choose() {
        let xs: Vec<usize> = (0..9).collect();
        for rank in ranks(&choose(9, 4)) {
            let subset = unrank_choose(&xs, 4, &rank);
            assert_eq!(rank_choose(9, &subset), rank);
        }
    }

    #[test]
    fn pairings_of_four() {
        let groups: Vec<Vec<Vec<u8>>> = (0u32..3)
            .map(|i| unrank_periodic_choose(&[0, 1, 2, 3], 2, &BigUint::from(i)))
            .collect();
        assert_debug_snapshot!(groups, @r"
        [
            [
                [
                    0,
                    1,
                ],
                [
                    2,
                    3,
                ],
            ],
            [
                [
                    0,
                    2,
                ],
                [
                    1,
                    3,
                ],
            ],
            [
                [
                    0,
                    3,
                ],
                [
                    1,
                    2,
                ],
            ],
        ]
        ");
    }

    #[test]
    fn group_partitions_are_distinct_and_complete() {
        let xs: Vec<u8> = (0..9).collect();
        let total = periodic_choose(9, 3).unwrap();
        let mut seen = BTreeSet::new();
        for rank in ranks(&total) {
            let groups = unrank_periodic_choose(&xs, 3, &rank);
            assert_eq!(groups.len(), 3);
            assert!(groups.iter().all(|g| g.len() == 3));
            let flat: BTreeSet<u8> = groups.iter().flatten().copied().collect();
            assert_eq!(flat.len(), 9);
            let canonical: BTreeSet<BTreeSet<u8>> = groups
                .into_iter()
                .map(|g| g.into_iter().collect())
                .collect();
            assert!(seen.insert(canonical));
        }
        assert_eq!(BigUint::from(seen.len()), total);
    }

    #[test]
    #[should_panic]
    fn periodic_choose_requires_divisible_length() {
        unrank_periodic_choose(&[1, 2, 3], 2, &BigUint::zero());
    }

    #[test]
    fn cyclic_arrangements_of_four() {
        let cycles: Vec<Vec<u8>> = (0u32..6)
            .map(|i| unrank_cyclic_permute(&[0, 1, 2, 3], &BigUint::from(i)))
            .collect();
        assert_eq!(
            cycles,
            vec![
                vec![1, 2, 3, 0],
                vec![3, 2, 0, 1],
                vec![1, 3, 0, 2],
                vec![2, 3, 1, 0],
                vec![2, 0, 3, 1],
                vec![3, 0, 1, 2],
            ]
        );
    }

    fn is_single_cycle(image: &[usize]) -> bool {
        let mut at = 0;
        for step in 1..=image.len() {
            at = image[at];
            if at == 0 {
                return step == image.len();
            }
        }
        false
    }

    #[test]
    fn every_cyclic_rank_is_a_distinct_full_cycle() {
        let xs: Vec<usize> = (0..6).collect();
        let total = factorial(5);
        let mut seen = BTreeSet::new();
        for rank in ranks(&total) {
            let image = unrank_cyclic_permute(&xs, &rank);
            assert!(is_single_cycle(&image), "{image:?} is not a 6-cycle");
            assert!(seen.insert(image));
        }
        assert_eq!(BigUint::from(seen.len()), total);
    }

    #[test]
    fn filtering_out_keeps_order() {
        assert_eq!(filtering_out(&[5, 1, 4, 2, 3], &[4, 5]), vec![1, 2, 3]);
        assert_eq!(filtering_out(&[1, 2], &[]), vec![1, 2]);
    }

    proptest! {
        #[test]
        fn unranked_subsets_are_ordered_and_sized(n in 0usize..40, k in 0usize..40, seed in any::<u64>()) {
            prop_assume!(k <= n);
            let total = choose(n, k);
            let rank = BigUint::from(seed) % &total;
            let xs: Vec<usize> = (0..n).collect();
            let subset = unrank_choose(&xs, k, &rank);
            prop_assert_eq!(subset.len(), k);
            prop_assert!(subset.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(rank_choose(n, &subset), rank);
        }
    }
}
