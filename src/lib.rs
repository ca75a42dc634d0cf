//! # Paradoxical Compression
//!
//! A lossless codec that shrinks some inputs, never grows any input, and
//! inverts every output it produces. A true bijection with those
//! properties cannot exist; this construction gets arbitrarily close by
//! making the colliding inputs cryptographically infeasible to exhibit.
//!
//! ## How it works
//!
//! Inputs that DEFLATE can shrink by more than a fixed header become
//! `payload || counter || f || pi`, where `(f, pi)` is a Wesolowski-style
//! verifiable-delay-function output binding the payload. Inputs whose
//! trailing bytes already carry a valid proof get their counter bumped and
//! the proof recomputed at the same length. Everything else passes
//! through byte-for-byte. Producing a second preimage of any artifact
//! requires forging a proof without running the sequential squaring
//! chain.
//!
//! ## Quick start
//!
//! ```rust
//! use paradox::{Codec, Modulus};
//!
//! let codec = Codec::new(Modulus::default_2048());
//!
//! let data = vec![0u8; 4096];
//! let packed = codec.compress(&data);
//! assert!(packed.len() < data.len());
//! assert_eq!(codec.decompress(&packed).unwrap(), data);
//!
//! // Incompressible inputs are returned unchanged, never expanded.
//! let artifact = codec.compress(b"tiny");
//! assert_eq!(artifact, b"tiny");
//! ```
//!
//! ## Caveats
//!
//! - This is not a general-purpose compressor: anything DEFLATE cannot
//!   shrink past the header budget passes through unchanged.
//! - Nothing here is constant-time; the modulus and all inputs are
//!   treated as public.
//! - A pigeonhole pair of inputs mapping to one artifact necessarily
//!   exists; finding one is as hard as forging the delay-function proof.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::all)]

/// Signed arbitrary-precision integers.
pub mod bigint;
/// The compress/decompress state machine.
pub mod codec;
/// Error types for the library.
pub mod error;
/// The group of signed residues modulo N.
pub mod group;
/// Keccak sponge and SHAKE128.
pub mod sponge;
/// The verifiable delay function and its hash oracles.
pub mod vdf;

pub use bigint::BigInt;
pub use codec::Codec;
pub use error::Error;
pub use group::{GroupElement, Modulus};
pub use sponge::Shake128;

/// A specialized Result type for codec operations.
pub type Result<T> = core::result::Result<T, Error>;
