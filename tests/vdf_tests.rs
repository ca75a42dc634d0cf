mod common;

use paradox::vdf;
use paradox::Modulus;

fn stripped(bytes: Vec<u8>) -> Vec<u8> {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

#[test]
fn evaluate_verifies_across_counters() {
    let (modulus, _) = common::mersenne_modulus();
    for counter in [0u128, 1, 2, 3, 17, 64, 129] {
        let (f, pi) = vdf::evaluate(&modulus, counter, b"some payload");
        assert!(
            vdf::verify(&modulus, counter, b"some payload", &f, &pi),
            "counter {counter}"
        );
    }
}

#[test]
fn evaluate_verifies_on_default_modulus() {
    let modulus = Modulus::default_2048();
    let (f, pi) = vdf::evaluate(&modulus, 10, b"payload");
    assert!(vdf::verify(&modulus, 10, b"payload", &f, &pi));
}

#[test]
fn evaluate_crosses_the_batch_boundary() {
    let (modulus, _) = common::mersenne_modulus();
    // 5000 squarings spans two 4096-squaring batches.
    let (f, pi) = vdf::evaluate(&modulus, 5000, b"batched");
    assert!(vdf::verify(&modulus, 5000, b"batched", &f, &pi));
}

#[test]
fn trapdoor_matches_honest_evaluation() {
    let (modulus, phi) = common::mersenne_modulus();
    let honest = vdf::evaluate(&modulus, 100, b"cross-check");
    let forged = common::eval_with_trapdoor(&modulus, &phi, 100, b"cross-check");
    assert_eq!(honest, forged);
}

#[test]
fn verify_rejects_mismatches() {
    let (modulus, _) = common::mersenne_modulus();
    let (f, pi) = vdf::evaluate(&modulus, 5, b"payload");
    assert!(!vdf::verify(&modulus, 6, b"payload", &f, &pi));
    assert!(!vdf::verify(&modulus, 5, b"other payload", &f, &pi));
    assert!(!vdf::verify(&modulus, 5, b"payload", &pi, &f));
}

#[test]
fn oracles_depend_on_the_modulus() {
    let (mersenne, _) = common::mersenne_modulus();
    let default = Modulus::default_2048();
    let a = vdf::hash_to_group(&mersenne, b"same input");
    let b = vdf::hash_to_group(&default, b"same input");
    assert_ne!(stripped(a.encode(&mersenne)), stripped(b.encode(&default)));
}

#[test]
fn hash_to_prime_stays_in_range() {
    use paradox::BigInt;
    let (modulus, _) = common::mersenne_modulus();
    let g = vdf::hash_to_group(&modulus, b"g");
    let f = vdf::hash_to_group(&modulus, b"f");
    let upper = (BigInt::ONE << 256usize) + BigInt::from(297);
    for counter in 0..8u128 {
        let ell = vdf::hash_to_prime(&modulus, &g, counter, &f);
        assert!(ell >= BigInt::from(3));
        assert!(ell <= upper);
        assert!(ell.is_prime());
    }
}
