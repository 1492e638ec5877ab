use num::{BigUint, One, Zero};

/// Binomial coefficient, zero when `k > n`.
pub fn choose(n: usize, k: usize) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    let k = k.min(n - k);
    let mut result = BigUint::one();
    for i in 1..=k {
        result = result * (n - (k - i)) / i;
    }
    result
}

pub fn factorial(n: usize) -> BigUint {
    (1..=n).map(BigUint::from).product()
}

/// Number of ways to split `n` elements into `n / r` unordered groups of size `r`.
///
/// Returns `None` unless `r` divides `n`.
pub fn periodic_choose(n: usize, r: usize) -> Option<BigUint> {
    if r == 0 || n % r != 0 {
        return None;
    }
    Some(group_partitions(n / r, r))
}

/// Number of ways to split `groups * size` elements into `groups` unordered groups of
/// `size` elements each, i.e. `(groups * size)! / (size!^groups * groups!)`.
pub fn group_partitions(groups: usize, size: usize) -> BigUint {
    let denominator = num::pow(factorial(size), groups) * factorial(groups);
    factorial(groups * size) / denominator
}
