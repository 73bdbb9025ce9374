//! Partial permutations: counting, lexicographic enumeration, and unranking.
//!
//! A k-permutation of `n` picks `k` distinct indices from `0..n` in order.
//! Enumeration order is lexicographic over the index tuples, which is the
//! order `itertools::permutations` yields for a sorted pool. Unranking uses
//! the same order, so `nth_permutation(n, k, r)` is the `r`-th item of
//! `KPermutations::new(n, k)`.

/// `n! / (n - k)!`, or `None` if it overflows `u128`. Zero when `k > n`.
pub fn partial_permutations(n: usize, k: usize) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let mut count: u128 = 1;
    for factor in (n - k + 1)..=n {
        count = count.checked_mul(factor as u128)?;
    }
    Some(count)
}

/// Iterator over the k-permutations of `0..n` in lexicographic order.
#[derive(Clone, Debug)]
pub struct KPermutations {
    n: usize,
    current: Option<Vec<usize>>,
    used: Vec<bool>,
    started: bool,
}

impl KPermutations {
    /// Starts the enumeration. Yields nothing when `k > n` and a single empty
    /// permutation when `k == 0`.
    pub fn new(n: usize, k: usize) -> Self {
        let (current, used) = if k > n {
            (None, vec![false; n])
        } else {
            let mut used = vec![false; n];
            used[..k].iter_mut().for_each(|u| *u = true);
            (Some((0..k).collect()), used)
        };
        Self {
            n,
            current,
            used,
            started: false,
        }
    }

    fn advance(&mut self) -> bool {
        let Some(perm) = self.current.as_mut() else {
            return false;
        };
        let k = perm.len();
        for i in (0..k).rev() {
            self.used[perm[i]] = false;
            if let Some(next) = (perm[i] + 1..self.n).find(|&j| !self.used[j]) {
                perm[i] = next;
                self.used[next] = true;
                let mut free = (0..self.n).filter(|&j| !self.used[j]);
                for slot in perm.iter_mut().skip(i + 1) {
                    // k <= n, so enough indices are free
                    let Some(j) = free.next() else { return false };
                    *slot = j;
                }
                for &j in &perm[i + 1..] {
                    self.used[j] = true;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for KPermutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if !self.started {
            self.started = true;
            return self.current.clone();
        }
        if self.advance() {
            self.current.clone()
        } else {
            self.current = None;
            None
        }
    }
}

/// The `rank`-th k-permutation of `0..n` in lexicographic order, or `None`
/// when `rank` is out of range.
pub fn nth_permutation(n: usize, k: usize, rank: u128) -> Option<Vec<usize>> {
    let total = partial_permutations(n, k)?;
    if rank >= total {
        return None;
    }
    let mut pool: Vec<usize> = (0..n).collect();
    let mut rank = rank;
    let mut perm = Vec::with_capacity(k);
    for i in 0..k {
        let block = partial_permutations(n - i - 1, k - i - 1)?;
        let pick = (rank / block) as usize;
        rank %= block;
        perm.push(pool.remove(pick));
    }
    Some(perm)
}
