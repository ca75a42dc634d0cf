//! The paradoxical compression state machine.
//!
//! Compression never expands: every branch returns an output no longer
//! than its input. Inputs that DEFLATE can shrink by more than the header
//! size become `payload || counter || f || pi` with counter 0; inputs
//! whose trailing bytes already form a valid proof have their counter
//! incremented and the proof recomputed, keeping the length constant;
//! everything else passes through untouched. Decompression inverts
//! whichever step applies, and inflates the payload once the counter
//! reaches 0.
//!
//! Exhibiting two inputs that compress to the same artifact requires a
//! valid proof that was not produced by the sequential squaring chain,
//! which is exactly what the delay function makes infeasible.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use tracing::debug;

use crate::error::Error;
use crate::group::{GroupElement, Modulus};
use crate::vdf;

/// Width of the encoded squaring counter, in bytes.
const COUNTER_LEN: usize = 16;

/// A paradoxical-compression codec over a fixed modulus.
///
/// Both directions are pure functions of the modulus and the input;
/// separate instances may run concurrently.
pub struct Codec {
    modulus: Modulus,
    max_counter: Option<u128>,
}

impl Codec {
    /// Creates a codec over the given modulus with no decompression
    /// counter cap, like the reference construction.
    pub fn new(modulus: Modulus) -> Self {
        Codec {
            modulus,
            max_counter: None,
        }
    }

    /// Creates a codec that rejects decompression inputs whose validated
    /// counter exceeds `max_counter`, bounding the squaring work an
    /// adversarial input can demand.
    pub fn with_max_counter(modulus: Modulus, max_counter: u128) -> Self {
        Codec {
            modulus,
            max_counter: Some(max_counter),
        }
    }

    /// The modulus this codec operates over.
    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    /// Size of the trailing header: counter plus two group elements.
    pub fn header_len(&self) -> usize {
        COUNTER_LEN + 2 * self.modulus.byte_len()
    }

    /// Compresses `data`. The output is never longer than the input, and
    /// inputs no longer than the header size are returned unchanged.
    pub fn compress(&self, data: &[u8]) -> Vec<u8> {
        let header = self.header_len();
        if data.len() <= header {
            return data.to_vec();
        }
        let deflated = deflate(data);
        if deflated.len() < data.len() - header {
            debug!(
                input = data.len(),
                payload = deflated.len(),
                "compressing via deflate"
            );
            let (f, pi) = vdf::evaluate(&self.modulus, 0, &deflated);
            return self.assemble(&deflated, 0, &f, &pi);
        }
        let (payload, trailer) = data.split_at(data.len() - header);
        if let Some((counter, f, pi)) = self.parse_trailer(trailer) {
            if vdf::verify(&self.modulus, counter, payload, &f, &pi) {
                let next = counter.wrapping_add(1);
                debug!(counter = next, "re-proving existing artifact");
                let (f, pi) = vdf::evaluate(&self.modulus, next, payload);
                return self.assemble(payload, next, &f, &pi);
            }
        }
        data.to_vec()
    }

    /// Decompresses `data`. Inputs without a valid trailing proof pass
    /// through unchanged; a validated counter-0 artifact is inflated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deflate`] when a validated payload fails to
    /// inflate, and [`Error::CounterCap`] when a configured cap is
    /// exceeded.
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        let header = self.header_len();
        if data.len() <= header {
            return Ok(data.to_vec());
        }
        let (payload, trailer) = data.split_at(data.len() - header);
        let Some((counter, f, pi)) = self.parse_trailer(trailer) else {
            return Ok(data.to_vec());
        };
        if !vdf::verify(&self.modulus, counter, payload, &f, &pi) {
            return Ok(data.to_vec());
        }
        if let Some(limit) = self.max_counter {
            if counter > limit {
                return Err(Error::CounterCap {
                    found: counter,
                    limit,
                });
            }
        }
        if counter > 0 {
            debug!(counter = counter - 1, "rewinding artifact");
            let (f, pi) = vdf::evaluate(&self.modulus, counter - 1, payload);
            Ok(self.assemble(payload, counter - 1, &f, &pi))
        } else {
            debug!(payload = payload.len(), "inflating payload");
            Ok(inflate(payload)?)
        }
    }

    fn assemble(
        &self,
        payload: &[u8],
        counter: u128,
        f: &GroupElement,
        pi: &GroupElement,
    ) -> Vec<u8> {
        let mut out = Vec::with_capacity(payload.len() + self.header_len());
        out.extend_from_slice(payload);
        out.extend_from_slice(&counter.to_be_bytes());
        out.extend_from_slice(&f.encode(&self.modulus));
        out.extend_from_slice(&pi.encode(&self.modulus));
        out
    }

    fn parse_trailer(&self, trailer: &[u8]) -> Option<(u128, GroupElement, GroupElement)> {
        let nlen = self.modulus.byte_len();
        let counter = u128::from_be_bytes(trailer[..COUNTER_LEN].try_into().ok()?);
        let f = GroupElement::try_decode(&trailer[COUNTER_LEN..COUNTER_LEN + nlen], &self.modulus)?;
        let pi = GroupElement::try_decode(&trailer[COUNTER_LEN + nlen..], &self.modulus)?;
        Some((counter, f, pi))
    }
}

/// Raw DEFLATE at the highest compression level.
fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .unwrap_or_else(|_| unreachable!("writing to a Vec cannot fail"));
    encoder
        .finish()
        .unwrap_or_else(|_| unreachable!("writing to a Vec cannot fail"))
}

fn inflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    DeflateDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_counter_plus_two_elements() {
        let codec = Codec::new(Modulus::default_2048());
        assert_eq!(codec.header_len(), 16 + 2 * 256);
    }

    #[test]
    fn short_inputs_pass_through() {
        let codec = Codec::new(Modulus::default_2048());
        let header = codec.header_len();
        for len in [0, 1, header - 1, header] {
            let data = vec![0x5Au8; len];
            assert_eq!(codec.compress(&data), data);
            assert_eq!(codec.decompress(&data).unwrap(), data);
        }
    }

    #[test]
    fn deflate_round_trip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(10);
        let packed = deflate(&data);
        assert_eq!(inflate(&packed).unwrap(), data);
    }

    #[test]
    fn inflate_rejects_garbage() {
        // 0xFF opens an invalid DEFLATE block type.
        assert!(inflate(&[0xFF, 0xFF, 0xFF, 0xFF]).is_err());
    }
}
