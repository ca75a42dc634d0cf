//! Shared helpers for the integration tests.

use paradox::vdf;
use paradox::{BigInt, GroupElement, Modulus};

/// A modulus with a factorization the tests know: the product of the
/// Mersenne primes 2^521 - 1 and 2^607 - 1 (1128 bits). Returns the
/// modulus together with Euler's phi.
pub fn mersenne_modulus() -> (Modulus, BigInt) {
    let p = (BigInt::ONE << 521usize) - BigInt::ONE;
    let q = (BigInt::ONE << 607usize) - BigInt::ONE;
    let n = &p * &q;
    let phi = (p - BigInt::ONE) * (q - BigInt::ONE);
    (Modulus::new(n).unwrap(), phi)
}

/// Forges the delay-function output for an arbitrarily large counter in
/// constant time, using the known group order. The honest evaluator would
/// need `counter` sequential squarings to produce the same pair.
#[allow(dead_code)]
pub fn eval_with_trapdoor(
    modulus: &Modulus,
    phi: &BigInt,
    counter: u128,
    input: &[u8],
) -> (GroupElement, GroupElement) {
    let g = vdf::hash_to_group(modulus, input);
    let two = BigInt::from(2);
    let t = BigInt::from(counter);
    let f = g.pow(&two.modpow(&t, phi), modulus);
    let ell = vdf::hash_to_prime(modulus, &g, counter, &f);

    // pi = g^(2^t div l). Reduce the quotient mod phi without inverting
    // l: 2^t - (2^t mod l) stays divisible by l after reduction mod
    // phi * l, so the division below is exact.
    let r = two.modpow(&t, &ell);
    let wide_modulus = phi * &ell;
    let mut quotient_times_ell = two.modpow(&t, &wide_modulus) - &r;
    if quotient_times_ell.is_negative() {
        quotient_times_ell = quotient_times_ell + &wide_modulus;
    }
    let exponent = quotient_times_ell / &ell;
    let pi = g.pow(&exponent, modulus);
    (f, pi)
}
