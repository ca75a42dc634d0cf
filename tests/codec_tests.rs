mod common;

use paradox::{Codec, Error, Modulus};
use rand_core::{OsRng, RngCore};

fn default_codec() -> Codec {
    Codec::new(Modulus::default_2048())
}

fn counter_bytes(codec: &Codec, artifact: &[u8]) -> [u8; 16] {
    let start = artifact.len() - codec.header_len();
    artifact[start..start + 16].try_into().unwrap()
}

#[test]
fn empty_input_round_trips_unchanged() {
    let codec = default_codec();
    assert_eq!(codec.compress(&[]), Vec::<u8>::new());
    assert_eq!(codec.decompress(&[]).unwrap(), Vec::<u8>::new());
}

#[test]
fn compressible_input_shrinks_and_round_trips() {
    let codec = default_codec();
    let data = vec![0u8; 2000];
    let packed = codec.compress(&data);
    assert!(packed.len() < data.len());
    assert_eq!(counter_bytes(&codec, &packed), [0u8; 16]);
    assert_eq!(codec.decompress(&packed).unwrap(), data);
}

#[test]
fn random_input_passes_through() {
    let mut data = vec![0u8; 2000];
    OsRng.fill_bytes(&mut data);
    let codec = default_codec();
    // DEFLATE cannot recover the header budget from random bytes, and a
    // random trailer does not hold a valid proof.
    assert_eq!(codec.compress(&data), data);
    assert_eq!(codec.decompress(&data).unwrap(), data);
}

#[test]
fn iterated_compression_is_non_expanding_and_invertible() {
    let codec = default_codec();
    let original = vec![0u8; 2000];
    let mut stages = vec![original.clone()];
    for i in 1..=5 {
        let next = codec.compress(stages.last().unwrap());
        assert!(
            next.len() <= stages.last().unwrap().len(),
            "expansion at iteration {i}"
        );
        stages.push(next);
    }
    // The first pass deflates; later passes keep the length and bump the
    // embedded counter.
    assert!(stages[1].len() < stages[0].len());
    for i in 2..=5 {
        assert_eq!(stages[i].len(), stages[1].len());
        let counter = u128::from_be_bytes(counter_bytes(&codec, &stages[i]));
        assert_eq!(counter, (i - 1) as u128);
    }
    let mut current = stages[5].clone();
    for _ in 0..5 {
        current = codec.decompress(&current).unwrap();
    }
    assert_eq!(current, original);
}

#[test]
fn pigeonhole_collision_via_counter_wrap() {
    let (modulus, phi) = common::mersenne_modulus();
    let codec = Codec::new(modulus.clone());

    // The honest artifact for a deflatable input.
    let m2 = vec![0u8; 2000];
    let c2 = codec.compress(&m2);
    assert!(c2.len() < m2.len());
    let payload = &c2[..c2.len() - codec.header_len()];

    // Forge a valid proof for the same payload at the maximum counter;
    // compression then wraps the counter back to zero.
    let (f, pi) = common::eval_with_trapdoor(&modulus, &phi, u128::MAX, payload);
    let mut m1 = payload.to_vec();
    m1.extend_from_slice(&u128::MAX.to_be_bytes());
    m1.extend_from_slice(&f.encode(&modulus));
    m1.extend_from_slice(&pi.encode(&modulus));

    assert_ne!(m1, m2);
    let c1 = codec.compress(&m1);
    assert_eq!(c1, c2, "both inputs must map to the same artifact");

    // The artifact decompresses to the deflatable preimage only; m1 is
    // the pigeonhole casualty.
    let recovered = codec.decompress(&c1).unwrap();
    assert_eq!(recovered, m2);
    assert_ne!(recovered, m1);
}

#[test]
fn tampered_proof_field_passes_through() {
    let codec = default_codec();
    let data = vec![0u8; 2000];
    let packed = codec.compress(&data);

    // Flip one bit inside the f field.
    let f_offset = packed.len() - codec.header_len() + 16;
    let mut tampered = packed.clone();
    tampered[f_offset + 40] ^= 0x01;
    assert_eq!(codec.decompress(&tampered).unwrap(), tampered);
}

#[test]
fn truncated_artifact_passes_through() {
    let codec = default_codec();
    let data = vec![0u8; 2000];
    let packed = codec.compress(&data);
    let truncated = &packed[..packed.len() - 1];
    assert_eq!(codec.decompress(truncated).unwrap(), truncated);
}

#[test]
fn counter_cap_rejects_expensive_artifacts() {
    let (modulus, _) = common::mersenne_modulus();
    let uncapped = Codec::new(modulus.clone());
    let data = vec![0u8; 2000];
    let once = uncapped.compress(&data);
    let twice = uncapped.compress(&once);
    assert_eq!(u128::from_be_bytes(counter_bytes(&uncapped, &twice)), 1);

    let capped = Codec::with_max_counter(modulus, 0);
    match capped.decompress(&twice) {
        Err(Error::CounterCap { found, limit }) => {
            assert_eq!(found, 1);
            assert_eq!(limit, 0);
        }
        other => panic!("expected a counter-cap error, got {other:?}"),
    }
    // The cap leaves cheap artifacts alone.
    assert_eq!(capped.decompress(&once).unwrap(), data);
}

#[test]
fn compress_is_deterministic() {
    let codec = default_codec();
    let data = b"abababababab".repeat(100);
    assert_eq!(codec.compress(&data), codec.compress(&data));
}
