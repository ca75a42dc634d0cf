//! The group of signed residues modulo N.
//!
//! Elements are the unordered pairs `{u, -u}` of invertible residues,
//! represented by the canonical lift in `[1, (N-1)/2]`. All
//! canonicalization lives in this module; the codec and the VDF only see
//! [`GroupElement`] values and their fixed-width encodings.

use crate::bigint::BigInt;
use crate::error::Error;

/// A validated codec modulus: a positive odd integer of at least 1024
/// bits whose factorization is presumed unknown.
#[derive(Clone, Debug)]
pub struct Modulus {
    n: BigInt,
    half: BigInt,
    byte_len: usize,
}

impl Modulus {
    /// Validates and adopts a modulus.
    ///
    /// # Errors
    ///
    /// Rejects values that are not positive, not odd, or shorter than
    /// 1024 bits.
    pub fn new(n: BigInt) -> Result<Self, Error> {
        if n.signum() <= 0 {
            return Err(Error::InvalidModulus("modulus must be positive".into()));
        }
        if n.is_even() {
            return Err(Error::InvalidModulus("modulus must be odd".into()));
        }
        let byte_len = n.to_bytes_be().len();
        if byte_len * 8 < 1024 {
            return Err(Error::InvalidModulus(format!(
                "modulus must be at least 1024 bits, got {} bytes",
                byte_len
            )));
        }
        let half = (&n - &BigInt::ONE) >> 1;
        Ok(Modulus { n, half, byte_len })
    }

    /// The built-in 2048-bit modulus (the RSA-2048 challenge number,
    /// whose factorization has never been published).
    pub fn default_2048() -> Self {
        Modulus::new(rsa_2048()).unwrap_or_else(|_| unreachable!("the built-in modulus is valid"))
    }

    /// The modulus value.
    pub fn n(&self) -> &BigInt {
        &self.n
    }

    /// The encoded length of N and of every group element, in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Reduces an integer into the group: `value mod N`, folded onto the
    /// canonical representative in `[1, (N-1)/2]`.
    pub fn reduce(&self, value: &BigInt) -> GroupElement {
        let r = value.rem_euclid(&self.n);
        if r > self.half {
            GroupElement(&self.n - &r)
        } else {
            GroupElement(r)
        }
    }
}

/// A group element, held as its canonical lift. Equality is equality of
/// lifts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupElement(BigInt);

impl GroupElement {
    /// The identity element.
    pub fn one() -> Self {
        GroupElement(BigInt::ONE)
    }

    /// Group multiplication.
    pub fn mul(&self, rhs: &GroupElement, modulus: &Modulus) -> GroupElement {
        modulus.reduce(&(&self.0 * &rhs.0))
    }

    /// Group exponentiation; a negative exponent inverts the base.
    pub fn pow(&self, exponent: &BigInt, modulus: &Modulus) -> GroupElement {
        modulus.reduce(&self.0.modpow(exponent, modulus.n()))
    }

    /// Fixed-width encoding: the canonical lift, unsigned big-endian,
    /// padded to exactly [`Modulus::byte_len`] bytes.
    pub fn encode(&self, modulus: &Modulus) -> Vec<u8> {
        let raw = self.0.to_bytes_be();
        let mut out = vec![0u8; modulus.byte_len() - raw.len()];
        out.extend_from_slice(&raw);
        out
    }

    /// Decodes exactly [`Modulus::byte_len`] bytes; accepts only values
    /// already in canonical form, `1 <= x <= (N-1)/2`.
    pub fn try_decode(bytes: &[u8], modulus: &Modulus) -> Option<GroupElement> {
        if bytes.len() != modulus.byte_len() {
            return None;
        }
        let x = BigInt::from_bytes_be(bytes);
        if x.is_zero() || x > modulus.half {
            return None;
        }
        Some(GroupElement(x))
    }
}

/// The RSA-2048 challenge modulus.
fn rsa_2048() -> BigInt {
    BigInt::from_str_radix(
        "C7970CEEDCC3B0754490201A7AA613CD73911081C790F5F1A8726F463550BB5B\
         7FF0DB8E1EA1189EC72F93D1650011BD721AEEACC2ACDE32A04107F0648C2813\
         A31F5B0B7765FF8B44B4B6FFC93384B646EB09C7CF5E8592D40EA33C80039F35\
         B4F14A04B51F7BFD781BE4D1673164BA8EB991C2C4D730BBBE35F592BDEF524A\
         F7E8DAEFD26C66FC02C479AF89D64D373F442709439DE66CEB955F3EA37D5159\
         F6135809F85334B5CB1813ADDC80CD05609F10AC6A95AD65872C909525BDAD32\
         BC729592642920F24C61DC5B3C3B7923E56B16A4D9D373D8721F24A3FC0F1B31\
         31F55615172866BCCC30F95054C824E733A5EB6817F7BC16399D48C6361CC7E5",
        16,
    )
    .unwrap_or_else(|_| unreachable!("the built-in modulus is valid hex"))
}
