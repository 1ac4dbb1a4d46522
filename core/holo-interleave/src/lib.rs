//! Golden-ratio residual interleaver (component C1).
//!
//! `Interleaver::new(n)` derives the single-cycle permutation step `s` and
//! exposes the forward mapping `pi(i) = (i * s) mod n` plus block membership
//! `I_b` used to split a flat residual of length `n` across `B` chunks.

use thiserror::Error;

/// `(1 + sqrt(5)) / 2`, taken to the precision spec.md specifies.
pub const PHI: f64 = 1.618_033_988_749_8949;

pub type Result<T> = std::result::Result<T, InterleaveError>;

#[derive(Error, Debug)]
pub enum InterleaveError {
    #[error("N must be at least 2, got {0}")]
    NTooSmall(u64),
    #[error("no step in [1, N-1] coprime to N={0} was found")]
    NoCoprimeStep(u64),
    #[error("block count B={b} exceeds N={n}")]
    BlockCountExceedsN { b: u64, n: u64 },
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Nearest positive integer to `(phi - 1) * n`, searching outward for the
/// first candidate in `[1, n-1]` coprime to `n`. Ties (equal distance to two
/// candidates) are broken toward the smaller one by trying `+` before `-`
/// at each distance, per spec.
fn nearest_coprime_step(n: u64) -> Result<u64> {
    let n_i = n as i128;
    let s0 = (((PHI - 1.0) * n as f64).round()) as i128;

    let is_valid = |cand: i128| cand >= 1 && cand <= n_i - 1 && gcd(cand as u64, n) == 1;

    if is_valid(s0) {
        return Ok(s0 as u64);
    }
    for dist in 1..=n_i {
        for cand in [s0 + dist, s0 - dist] {
            if is_valid(cand) {
                return Ok(cand as u64);
            }
        }
    }
    Err(InterleaveError::NoCoprimeStep(n))
}

/// The golden permutation `pi` of `{0, ..., n-1}` for a given residual length.
#[derive(Debug, Clone, Copy)]
pub struct Interleaver {
    n: u64,
    s: u64,
}

impl Interleaver {
    pub fn new(n: u64) -> Result<Self> {
        if n < 2 {
            return Err(InterleaveError::NTooSmall(n));
        }
        let s = nearest_coprime_step(n)?;
        Ok(Self { n, s })
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn step(&self) -> u64 {
        self.s
    }

    /// `pi(i) = (i * s) mod n`, computed in 128-bit arithmetic so `n` up to
    /// ~2^31 never overflows a 64-bit product.
    pub fn forward(&self, i: u64) -> u64 {
        debug_assert!(i < self.n);
        ((i as u128 * self.s as u128) % self.n as u128) as u64
    }

    /// The residual positions owned by chunk `b` of `block_count`, in
    /// generation order `pi(b), pi(b+B), pi(b+2B), ...`. This order is part
    /// of the wire format: the slice array and this index array must align
    /// positionally.
    pub fn block_indices(&self, b: u64, block_count: u64) -> Result<Vec<u64>> {
        if block_count > self.n {
            return Err(InterleaveError::BlockCountExceedsN {
                b: block_count,
                n: self.n,
            });
        }
        let mut out = Vec::with_capacity(((self.n - b.min(self.n)) / block_count + 1) as usize);
        let mut k = 0u64;
        loop {
            let src = b + k * block_count;
            if src >= self.n {
                break;
            }
            out.push(self.forward(src));
            k += 1;
        }
        Ok(out)
    }

    /// `|I_b|` without materializing the index vector.
    pub fn block_len(&self, b: u64, block_count: u64) -> u64 {
        if b >= self.n {
            0
        } else {
            (self.n - b).div_ceil(block_count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_ns() -> Vec<u64> {
        vec![
            2, 3, 4, 5, 7, 8, 9, 16, 17, 31, 32, 64, 97, 100, 101, 255, 256, 257, 1000, 1024,
            1_000_000, 1_048_576, 999_983,
        ]
    }

    #[test]
    fn bijectivity_and_coprimality() {
        for n in sample_ns() {
            let interleaver = Interleaver::new(n).unwrap();
            assert_eq!(gcd(interleaver.step(), n), 1);

            let mut seen = HashSet::with_capacity(n as usize);
            for i in 0..n {
                let mapped = interleaver.forward(i);
                assert!(mapped < n);
                assert!(seen.insert(mapped), "pi not injective for N={n}");
            }
            assert_eq!(seen.len(), n as usize);
        }
    }

    #[test]
    fn partition_property() {
        for n in [2, 5, 16, 100, 1000] {
            let interleaver = Interleaver::new(n).unwrap();
            for b_count in [1, 2, 3, 7, n] {
                let mut all = HashSet::new();
                for b in 0..b_count {
                    let indices = interleaver.block_indices(b, b_count).unwrap();
                    assert_eq!(indices.len() as u64, interleaver.block_len(b, b_count));
                    for idx in indices {
                        assert!(all.insert(idx), "blocks overlap for N={n} B={b_count}");
                    }
                }
                assert_eq!(all.len() as u64, n);
            }
        }
    }

    #[test]
    fn n_too_small_is_rejected() {
        assert!(matches!(Interleaver::new(0), Err(InterleaveError::NTooSmall(0))));
        assert!(matches!(Interleaver::new(1), Err(InterleaveError::NTooSmall(1))));
    }

    #[test]
    fn block_count_cannot_exceed_n() {
        let interleaver = Interleaver::new(10).unwrap();
        assert!(matches!(
            interleaver.block_indices(0, 11),
            Err(InterleaveError::BlockCountExceedsN { b: 11, n: 10 })
        ));
    }
}
