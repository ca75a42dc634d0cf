//! Primality testing and random prime generation.

use rand_core::{CryptoRngCore, OsRng};

use super::BigInt;

/// Bitmap of the primes below 512, one bit per integer.
const SMALL_PRIME_BITMAP: [u64; 8] = [
    0x28208A20A08A28AC,
    0x800228A202088288,
    0x8028208820A00A08,
    0x08028228800800A2,
    0x228800200A20A082,
    0x8820808228020800,
    0x0882802802022020,
    0x208808808008A202,
];

/// Products of the odd primes in `[3, 511]`, each product fitting one
/// limb, paired with its factors. One long division per product replaces
/// a division per prime.
const TRIAL_DIVISION: &[(u64, &[u64])] = &[
    (
        0xE221F97C30E94E1D,
        &[3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53],
    ),
    (
        0x6329899EA9F2714B,
        &[59, 61, 67, 71, 73, 79, 83, 89, 97, 101],
    ),
    (
        0x58EDCB4C9ED39C8B,
        &[103, 107, 109, 113, 127, 131, 137, 139, 149],
    ),
    (
        0x09966FF94FD516FB,
        &[151, 157, 163, 167, 173, 179, 181, 191],
    ),
    (
        0x3BD7632C1F36EB51,
        &[193, 197, 199, 211, 223, 227, 229, 233],
    ),
    (0x00FD14B3C90D88A9, &[239, 241, 251, 257, 263, 269, 271]),
    (0x02AD3DBE0CCA85FF, &[277, 281, 283, 293, 307, 311, 313]),
    (0x0787F9A02C3388A7, &[317, 331, 337, 347, 349, 353, 359]),
    (0x1113C5CC6D101657, &[367, 373, 379, 383, 389, 397, 401]),
    (0x2456C94F936BDB15, &[409, 419, 421, 431, 433, 439, 443]),
    (0x4236A30B85FFE139, &[449, 457, 461, 463, 467, 479, 487]),
    (0x0000000E9AEF58CB, &[491, 499, 503, 509]),
];

/// Default Miller-Rabin round count; 50 rounds bound the error below
/// 2^-100 for any input.
const DEFAULT_ROUNDS: usize = 50;

/// Miller-Rabin round counts by candidate bit size, enough for an error
/// bound of 2^-80 on randomly chosen candidates (HAC table 4.4).
const ROUNDS_BY_BITS: &[(usize, usize)] = &[
    (1300, 2),
    (850, 3),
    (650, 4),
    (550, 5),
    (450, 6),
    (400, 7),
    (350, 8),
    (300, 9),
    (250, 12),
    (200, 15),
    (150, 18),
    (100, 27),
];

impl BigInt {
    /// Probabilistic primality test: a small-prime bitmap, trial division
    /// by the odd primes up to 511, then 50 Miller-Rabin rounds with
    /// bases drawn from the operating system's RNG. This and
    /// [`random_prime`] are the only consumers of randomness in the
    /// crate; the codec itself is deterministic.
    pub fn is_prime(&self) -> bool {
        self.is_prime_with_rounds(DEFAULT_ROUNDS, &mut OsRng)
    }

    fn is_prime_with_rounds<R: CryptoRngCore>(&self, rounds: usize, rng: &mut R) -> bool {
        if let Some(small) = self.to_u64().filter(|&v| v < 512) {
            return SMALL_PRIME_BITMAP[small as usize / 64] >> (small % 64) & 1 == 1;
        }
        if self.is_negative() || self.is_even() {
            return false;
        }
        for &(product, primes) in TRIAL_DIVISION {
            let rem = self.rem_u64(product);
            if primes.iter().any(|&p| rem % p == 0) {
                return false;
            }
        }
        self.miller_rabin(rounds, rng)
    }

    /// The value modulo a single limb; the value must be non-negative.
    fn rem_u64(&self, divisor: u64) -> u64 {
        let mut buf = [0u64; 1];
        let (_, mag) = self.parts(&mut buf);
        let mut rem = 0u64;
        for &limb in mag.iter().rev() {
            rem = (((rem as u128) << 64 | limb as u128) % divisor as u128) as u64;
        }
        rem
    }

    /// Miller-Rabin with random bases; the candidate is odd and > 512.
    fn miller_rabin<R: CryptoRngCore>(&self, rounds: usize, rng: &mut R) -> bool {
        let n_minus_1 = self - &BigInt::ONE;
        let s = n_minus_1.trailing_zeros();
        let d = &n_minus_1 >> s;
        let two = BigInt::from(2);
        let n_minus_3 = &n_minus_1 - &two;
        'round: for _ in 0..rounds {
            // Uniform base in [2, n - 2].
            let base = &two + &random_below(rng, &n_minus_3);
            let mut x = base.modpow(&d, self);
            if x.is_one() || x == n_minus_1 {
                continue;
            }
            for _ in 0..s - 1 {
                x = (&x * &x).rem_euclid(self);
                if x == n_minus_1 {
                    continue 'round;
                }
            }
            return false;
        }
        true
    }
}

/// A uniform value in `[0, bound)`; `bound` must be positive.
pub(crate) fn random_below<R: CryptoRngCore>(rng: &mut R, bound: &BigInt) -> BigInt {
    debug_assert!(bound.signum() > 0);
    let bits = bound.bit_length();
    loop {
        let candidate = random_bits(rng, bits);
        if &candidate < bound {
            return candidate;
        }
    }
}

fn random_bits<R: CryptoRngCore>(rng: &mut R, bits: usize) -> BigInt {
    let mut bytes = vec![0u8; bits.div_ceil(8)];
    rng.fill_bytes(&mut bytes);
    if bits % 8 != 0 {
        bytes[0] &= (1u8 << (bits % 8)) - 1;
    }
    BigInt::from_bytes_be(&bytes)
}

fn rounds_for_bits(bits: usize) -> usize {
    for &(threshold, rounds) in ROUNDS_BY_BITS {
        if bits >= threshold {
            return rounds;
        }
    }
    DEFAULT_ROUNDS
}

/// Generates a random prime `p` with `min <= p < max`.
///
/// When `divisor` is given, `p - 1` is a multiple of it; when
/// `three_mod_four` is set, `p = 3 (mod 4)`. The Miller-Rabin round count
/// follows the standard bit-size table. The caller is responsible for
/// supplying a range that actually contains a matching prime; the search
/// loops until it finds one.
///
/// # Panics
///
/// Panics unless `2 <= min < max`.
pub fn random_prime<R: CryptoRngCore>(
    rng: &mut R,
    min: &BigInt,
    max: &BigInt,
    divisor: Option<&BigInt>,
    three_mod_four: bool,
) -> BigInt {
    assert!(
        min >= &BigInt::from(2) && min < max,
        "prime range must satisfy 2 <= min < max"
    );
    let four = BigInt::from(4);
    loop {
        let candidate = match divisor {
            Some(q) => {
                // p = q * k + 1 for k in the widest range keeping p in bounds.
                let k_min = &(&(min - &BigInt::ONE) + q) - &BigInt::ONE;
                let k_min = &k_min / q;
                let k_max = &(max - &BigInt::from(2)) / q;
                if k_min > k_max {
                    panic!("no multiple of the divisor fits the prime range");
                }
                let k = &k_min + &random_below(rng, &(&(&k_max - &k_min) + &BigInt::ONE));
                q * k + BigInt::ONE
            }
            None => {
                let span = max - min;
                let mut p = min + &random_below(rng, &span);
                if p.is_even() {
                    p = p + BigInt::ONE;
                }
                p
            }
        };
        if &candidate < min || &candidate >= max || candidate.is_even() {
            continue;
        }
        if three_mod_four && candidate.rem_euclid(&four) != BigInt::from(3) {
            continue;
        }
        let rounds = rounds_for_bits(candidate.bit_length());
        if candidate.is_prime_with_rounds(rounds, rng) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_primes_match_bitmap() {
        let primes = [2u64, 3, 5, 7, 11, 13, 127, 251, 257, 509];
        for p in primes {
            assert!(BigInt::from(p).is_prime(), "{p}");
        }
        let composites = [0u64, 1, 4, 9, 255, 256, 511];
        for c in composites {
            assert!(!BigInt::from(c).is_prime(), "{c}");
        }
    }

    #[test]
    fn negative_numbers_are_not_prime() {
        assert!(!BigInt::from(-7).is_prime());
    }

    #[test]
    fn trial_division_catches_semiprimes() {
        // 523 * 541 has no factor below 512 and must reach Miller-Rabin;
        // 3 * 191 must die in trial division.
        assert!(!BigInt::from(523u64 * 541).is_prime());
        assert!(!BigInt::from(3u64 * 191).is_prime());
        assert!(BigInt::from(523u64).is_prime());
    }

    #[test]
    fn known_large_prime() {
        // 2^127 - 1 is a Mersenne prime.
        let p = (BigInt::ONE << 127usize) - BigInt::ONE;
        assert!(p.is_prime());
        assert!(!(p * BigInt::from(3)).is_prime());
    }

    #[test]
    fn carmichael_numbers_rejected() {
        for n in [561u64, 41041, 825265] {
            assert!(!BigInt::from(n).is_prime(), "{n}");
        }
    }

    #[test]
    fn random_prime_basic_range() {
        let mut rng = OsRng;
        let min = BigInt::ONE << 63usize;
        let max = BigInt::ONE << 64usize;
        let p = random_prime(&mut rng, &min, &max, None, false);
        assert!(p >= min && p < max);
        assert!(p.is_prime());
    }

    #[test]
    fn random_prime_three_mod_four() {
        let mut rng = OsRng;
        let min = BigInt::from(1u64 << 32);
        let max = BigInt::from(1u64 << 33);
        let p = random_prime(&mut rng, &min, &max, None, true);
        assert_eq!(p.rem_euclid(&BigInt::from(4)), BigInt::from(3));
        assert!(p.is_prime());
    }

    #[test]
    fn random_prime_with_divisor() {
        let mut rng = OsRng;
        let q = BigInt::from(65537u64);
        let min = BigInt::from(1u64 << 40);
        let max = BigInt::from(1u64 << 44);
        let p = random_prime(&mut rng, &min, &max, Some(&q), false);
        assert!(p.is_prime());
        assert_eq!((p - BigInt::ONE).rem_euclid(&q), BigInt::ZERO);
    }
}
