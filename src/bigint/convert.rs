//! Byte-string and radix conversions.

use core::fmt;
use core::str::FromStr;

use super::modular::div_rem_mag_u64;
use super::BigInt;
use crate::error::Error;

const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

impl BigInt {
    /// Minimal unsigned big-endian encoding. Zero encodes as the empty
    /// string.
    ///
    /// # Panics
    ///
    /// Panics if the value is negative.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let mut out = self.to_bytes_le();
        out.reverse();
        out
    }

    /// Minimal unsigned little-endian encoding.
    ///
    /// # Panics
    ///
    /// Panics if the value is negative.
    pub fn to_bytes_le(&self) -> Vec<u8> {
        assert!(
            !self.is_negative(),
            "unsigned encoding is defined only for non-negative values"
        );
        let mut buf = [0u64; 1];
        let (_, mag) = self.parts(&mut buf);
        let mut out = Vec::with_capacity(mag.len() * 8);
        for &limb in mag {
            out.extend_from_slice(&limb.to_le_bytes());
        }
        while out.last() == Some(&0) {
            out.pop();
        }
        out
    }

    /// Parses an unsigned big-endian byte string.
    pub fn from_bytes_be(bytes: &[u8]) -> BigInt {
        let mut le = bytes.to_vec();
        le.reverse();
        BigInt::from_bytes_le(&le)
    }

    /// Parses an unsigned little-endian byte string.
    pub fn from_bytes_le(bytes: &[u8]) -> BigInt {
        let mut limbs = Vec::with_capacity(bytes.len().div_ceil(8));
        for chunk in bytes.chunks(8) {
            let mut limb = [0u8; 8];
            limb[..chunk.len()].copy_from_slice(chunk);
            limbs.push(u64::from_le_bytes(limb));
        }
        BigInt::from_sign_magnitude(false, limbs)
    }

    /// Minimal two's-complement big-endian encoding. Zero encodes as the
    /// empty string; the top bit of the first byte carries the sign.
    pub fn to_bytes_be_signed(&self) -> Vec<u8> {
        let mut out = self.to_bytes_le_signed();
        out.reverse();
        out
    }

    /// Minimal two's-complement little-endian encoding.
    pub fn to_bytes_le_signed(&self) -> Vec<u8> {
        if self.is_zero() {
            return Vec::new();
        }
        if !self.is_negative() {
            let mut out = self.to_bytes_le();
            if out.last().is_some_and(|&b| b & 0x80 != 0) {
                out.push(0x00);
            }
            return out;
        }
        let mut out = self.abs().to_bytes_le();
        for byte in &mut out {
            *byte = !*byte;
        }
        for byte in &mut out {
            let (sum, carry) = byte.overflowing_add(1);
            *byte = sum;
            if !carry {
                break;
            }
        }
        if out.last().is_some_and(|&b| b & 0x80 == 0) {
            out.push(0xFF);
        }
        out
    }

    /// Parses a two's-complement big-endian byte string.
    pub fn from_bytes_be_signed(bytes: &[u8]) -> BigInt {
        let mut le = bytes.to_vec();
        le.reverse();
        BigInt::from_bytes_le_signed(&le)
    }

    /// Parses a two's-complement little-endian byte string.
    pub fn from_bytes_le_signed(bytes: &[u8]) -> BigInt {
        if !bytes.last().is_some_and(|&b| b & 0x80 != 0) {
            return BigInt::from_bytes_le(bytes);
        }
        let mut mag = bytes.to_vec();
        for byte in &mut mag {
            *byte = !*byte;
        }
        for byte in &mut mag {
            let (sum, carry) = byte.overflowing_add(1);
            *byte = sum;
            if !carry {
                break;
            }
        }
        -BigInt::from_bytes_le(&mag)
    }

    /// Parses a string in the given radix. A leading `-` negates; `0x`/`0X`
    /// is accepted for radix 16 and `0b`/`0B` for radix 2. Digits beyond 9
    /// may be in either case.
    ///
    /// # Panics
    ///
    /// Panics if `radix` is outside `2..=36`.
    pub fn from_str_radix(input: &str, radix: u32) -> Result<BigInt, Error> {
        assert!((2..=36).contains(&radix), "radix must be in 2..=36");
        let (negative, rest) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        let rest = match radix {
            16 => rest
                .strip_prefix("0x")
                .or_else(|| rest.strip_prefix("0X"))
                .unwrap_or(rest),
            2 => rest
                .strip_prefix("0b")
                .or_else(|| rest.strip_prefix("0B"))
                .unwrap_or(rest),
            _ => rest,
        };
        if rest.is_empty() {
            return Err(Error::InvalidLiteral(format!("empty literal {input:?}")));
        }
        let (chunk, chunk_digits) = radix_chunk(radix);
        let mut value = BigInt::ZERO;
        let bytes = rest.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            let take = chunk_digits.min(bytes.len() - pos);
            let mut part = 0u64;
            for &byte in &bytes[pos..pos + take] {
                let digit = digit_value(byte).filter(|&d| d < radix).ok_or_else(|| {
                    Error::InvalidLiteral(format!(
                        "invalid digit {:?} for radix {radix}",
                        byte as char
                    ))
                })?;
                part = part * radix as u64 + digit as u64;
            }
            let scale = if take == chunk_digits {
                chunk
            } else {
                (radix as u64).pow(take as u32)
            };
            value = value * BigInt::from(scale) + BigInt::from(part);
            pos += take;
        }
        Ok(if negative { -value } else { value })
    }

    /// Formats the value in the given radix. Digits beyond 9 are uppercase.
    ///
    /// # Panics
    ///
    /// Panics if `radix` is outside `2..=36`.
    pub fn to_str_radix(&self, radix: u32) -> String {
        assert!((2..=36).contains(&radix), "radix must be in 2..=36");
        if self.is_zero() {
            return "0".to_string();
        }
        let mut buf = [0u64; 1];
        let (negative, mag) = self.parts(&mut buf);
        let (chunk, chunk_digits) = radix_chunk(radix);
        let mut rest = mag.to_vec();
        let mut groups = Vec::new();
        while !rest.is_empty() {
            let (quotient, part) = div_rem_mag_u64(&rest, chunk);
            rest = quotient;
            groups.push(part);
        }
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        for (i, &group) in groups.iter().enumerate().rev() {
            let pad = if i + 1 == groups.len() { 1 } else { chunk_digits };
            out.push_str(&format_u64_radix(group, radix, pad));
        }
        out
    }
}

/// Largest power of `radix` that fits `u64`, with its digit count.
fn radix_chunk(radix: u32) -> (u64, usize) {
    let mut chunk = radix as u64;
    let mut digits = 1;
    while chunk <= u64::MAX / radix as u64 {
        chunk *= radix as u64;
        digits += 1;
    }
    (chunk, digits)
}

fn digit_value(byte: u8) -> Option<u32> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0') as u32),
        b'a'..=b'z' => Some((byte - b'a') as u32 + 10),
        b'A'..=b'Z' => Some((byte - b'A') as u32 + 10),
        _ => None,
    }
}

fn format_u64_radix(mut value: u64, radix: u32, min_digits: usize) -> String {
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % radix as u64) as usize]);
        value /= radix as u64;
    }
    while digits.len() < min_digits {
        digits.push(b'0');
    }
    digits.reverse();
    String::from_utf8(digits).expect("radix digits are ASCII")
}

impl FromStr for BigInt {
    type Err = Error;

    /// Parses decimal by default; `0x` and `0b` prefixes select radix 16
    /// and 2.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let body = input.strip_prefix('-').unwrap_or(input);
        if body.starts_with("0x") || body.starts_with("0X") {
            BigInt::from_str_radix(input, 16)
        } else if body.starts_with("0b") || body.starts_with("0B") {
            BigInt::from_str_radix(input, 2)
        } else {
            BigInt::from_str_radix(input, 10)
        }
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_radix(10))
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
