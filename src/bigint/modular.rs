//! Division, modular reduction, inverses and exponentiation.
//!
//! Modular exponentiation splits the modulus into an odd part, handled with
//! Montgomery multiplication, and a power-of-two part, handled with plain
//! truncating arithmetic; the halves are recombined by CRT. This keeps the
//! hot path (odd 2048-bit moduli) on the Montgomery loop while still
//! honoring arbitrary even moduli.

use core::cmp::Ordering;

use super::{cmp_mag, forward_binop, shl_mag, shr_mag, BigInt, Repr};

impl BigInt {
    /// Truncated division with remainder: `self = q * divisor + r` with
    /// `|r| < |divisor|`, the quotient rounded toward zero and the
    /// remainder taking the dividend's sign.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    pub fn div_rem(&self, divisor: &BigInt) -> (BigInt, BigInt) {
        assert!(!divisor.is_zero(), "division by zero");
        if let (Repr::Small(a), Repr::Small(b)) = (&self.repr, &divisor.repr) {
            let (a, b) = (*a as i128, *b as i128);
            return (BigInt::from(a / b), BigInt::from(a % b));
        }
        let (mut ba, mut bb) = ([0u64; 1], [0u64; 1]);
        let (sa, a) = self.parts(&mut ba);
        let (sb, b) = divisor.parts(&mut bb);
        if cmp_mag(a, b) == Ordering::Less {
            return (BigInt::ZERO, self.clone());
        }
        let (q_mag, r_mag) = if b.len() == 1 {
            let (q, r) = div_rem_mag_u64(a, b[0]);
            (q, vec![r])
        } else {
            div_rem_mag(a, b)
        };
        (
            BigInt::from_sign_magnitude(sa != sb, q_mag),
            BigInt::from_sign_magnitude(sa, r_mag),
        )
    }

    /// The unique representative of `self` in `[0, |modulus|)`.
    ///
    /// # Panics
    ///
    /// Panics if `modulus` is zero.
    pub fn rem_euclid(&self, modulus: &BigInt) -> BigInt {
        let r = self.div_rem(modulus).1;
        if r.is_negative() {
            r + modulus.abs()
        } else {
            r
        }
    }

    /// Binary extended GCD: returns `(g, u, v)` with `g = self * u +
    /// other * v` and `g >= 0`.
    pub fn gcd_ext(&self, other: &BigInt) -> (BigInt, BigInt, BigInt) {
        if self.is_zero() {
            return (other.abs(), BigInt::ZERO, BigInt::from(other.signum()));
        }
        if other.is_zero() {
            return (self.abs(), BigInt::from(self.signum()), BigInt::ZERO);
        }
        let mut x = self.abs();
        let mut y = other.abs();
        let mut shift = 0usize;
        while x.is_even() && y.is_even() {
            x = x >> 1;
            y = y >> 1;
            shift += 1;
        }
        let x0 = x.clone();
        let y0 = y.clone();
        let mut u = x;
        let mut v = y;
        let (mut a, mut b) = (BigInt::ONE, BigInt::ZERO);
        let (mut c, mut d) = (BigInt::ZERO, BigInt::ONE);
        loop {
            while u.is_even() {
                u = u >> 1;
                if a.is_even() && b.is_even() {
                    a = a >> 1;
                    b = b >> 1;
                } else {
                    a = (a + &y0) >> 1;
                    b = (b - &x0) >> 1;
                }
            }
            while v.is_even() {
                v = v >> 1;
                if c.is_even() && d.is_even() {
                    c = c >> 1;
                    d = d >> 1;
                } else {
                    c = (c + &y0) >> 1;
                    d = (d - &x0) >> 1;
                }
            }
            if u >= v {
                u = &u - &v;
                a = a - &c;
                b = b - &d;
            } else {
                v = &v - &u;
                c = c - &a;
                d = d - &b;
            }
            if u.is_zero() {
                let g = v << shift;
                let (u_coeff, v_coeff) = (c, d);
                // Coefficients were computed against |self| and |other|.
                let u_coeff = if self.is_negative() { -u_coeff } else { u_coeff };
                let v_coeff = if other.is_negative() { -v_coeff } else { v_coeff };
                return (g, u_coeff, v_coeff);
            }
        }
    }

    /// Greatest common divisor, always non-negative.
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        self.gcd_ext(other).0
    }

    /// Modular inverse: the representative in `[0, modulus)` of
    /// `self^-1`. Works for even moduli via the odd/power-of-two split.
    ///
    /// # Panics
    ///
    /// Panics if `modulus` is not positive or if no inverse exists.
    pub fn inv_mod(&self, modulus: &BigInt) -> BigInt {
        assert!(modulus.signum() > 0, "inverse requires a positive modulus");
        if modulus.is_one() {
            return BigInt::ZERO;
        }
        let a = self.rem_euclid(modulus);
        if modulus.is_odd() {
            return inv_mod_odd(&a, modulus);
        }
        let t = modulus.trailing_zeros();
        assert!(
            a.is_odd(),
            "value is not invertible modulo the given modulus"
        );
        let inv2 = hensel_inverse(&a, t);
        let m1 = modulus >> t;
        if m1.is_one() {
            return inv2;
        }
        let inv1 = inv_mod_odd(&a.rem_euclid(&m1), &m1);
        crt_combine(&inv1, &inv2, &m1, t)
    }

    /// Modular exponentiation: `self^exponent mod |modulus|`, result in
    /// `[0, |modulus|)`. A negative exponent inverts the base first; a
    /// modulus of magnitude 1 yields 0.
    ///
    /// # Panics
    ///
    /// Panics if `modulus` is zero, or if the exponent is negative and the
    /// base is not invertible.
    pub fn modpow(&self, exponent: &BigInt, modulus: &BigInt) -> BigInt {
        assert!(!modulus.is_zero(), "modpow requires a non-zero modulus");
        let m = modulus.abs();
        if m.is_one() {
            return BigInt::ZERO;
        }
        let (base, exp);
        if exponent.is_negative() {
            base = self.inv_mod(&m);
            exp = -exponent;
        } else {
            base = self.rem_euclid(&m);
            exp = exponent.clone();
        }
        if exp.is_zero() {
            return BigInt::ONE;
        }
        if m.is_odd() {
            return mont_pow(&base, &exp, &m);
        }
        let t = m.trailing_zeros();
        let a2 = pow_mod_pow2(&base, &exp, t);
        let m1 = &m >> t;
        if m1.is_one() {
            return a2;
        }
        let a1 = mont_pow(&base.rem_euclid(&m1), &exp, &m1);
        crt_combine(&a1, &a2, &m1, t)
    }
}

impl core::ops::Div<&BigInt> for &BigInt {
    type Output = BigInt;

    fn div(self, rhs: &BigInt) -> BigInt {
        self.div_rem(rhs).0
    }
}

impl core::ops::Rem<&BigInt> for &BigInt {
    type Output = BigInt;

    fn rem(self, rhs: &BigInt) -> BigInt {
        self.div_rem(rhs).1
    }
}

forward_binop!(Div, div);
forward_binop!(Rem, rem);

/// Solves `x = a1 mod m1`, `x = a2 mod 2^t` for odd `m1`; result in
/// `[0, m1 * 2^t)`.
fn crt_combine(a1: &BigInt, a2: &BigInt, m1: &BigInt, t: usize) -> BigInt {
    let mask = (BigInt::ONE << t) - BigInt::ONE;
    let m1_inv = hensel_inverse(&m1.rem_euclid(&(&mask + &BigInt::ONE)), t);
    a1 + m1 * (((a2 - a1) * m1_inv) & mask)
}

/// Inverse of odd `a` modulo `2^t` by Newton lifting.
fn hensel_inverse(a: &BigInt, t: usize) -> BigInt {
    debug_assert!(a.is_odd());
    let mask_full = (BigInt::ONE << t) - BigInt::ONE;
    let mut inv = BigInt::ONE;
    let mut bits = 1usize;
    while bits < t {
        bits = (bits * 2).min(t);
        let mask = (BigInt::ONE << bits) - BigInt::ONE;
        let prod = (a * &inv) & &mask;
        inv = (&inv * (BigInt::from(2) - prod)) & mask;
    }
    inv & mask_full
}

fn inv_mod_odd(a: &BigInt, m: &BigInt) -> BigInt {
    let (g, u, _) = a.gcd_ext(m);
    assert!(
        g.is_one(),
        "value is not invertible modulo the given modulus"
    );
    u.rem_euclid(m)
}

fn pow_mod_pow2(base: &BigInt, exp: &BigInt, t: usize) -> BigInt {
    let mask = (BigInt::ONE << t) - BigInt::ONE;
    let base = base & &mask;
    let mut acc = BigInt::ONE;
    for i in (0..exp.bit_length()).rev() {
        acc = (&acc * &acc) & &mask;
        if exp.test_bit(i) {
            acc = (&acc * &base) & &mask;
        }
    }
    acc
}

/// Left-to-right binary exponentiation in Montgomery form; `m` odd and
/// at least 3, `base` in `[0, m)`, `exp` positive.
fn mont_pow(base: &BigInt, exp: &BigInt, m: &BigInt) -> BigInt {
    let mut mbuf = [0u64; 1];
    let (_, m_limbs) = m.parts(&mut mbuf);
    let m_limbs = m_limbs.to_vec();
    let k = m_limbs.len();
    let n0 = mont_n0(m_limbs[0]);
    let rr = to_limbs(&(BigInt::ONE << (128 * k)).rem_euclid(m), k);
    let mut one = vec![0u64; k];
    one[0] = 1;
    let base_m = mont_mul(&to_limbs(base, k), &rr, &m_limbs, n0);
    // R mod m, the Montgomery image of 1.
    let mut acc = mont_mul(&rr, &one, &m_limbs, n0);
    for i in (0..exp.bit_length()).rev() {
        acc = mont_mul(&acc, &acc, &m_limbs, n0);
        if exp.test_bit(i) {
            acc = mont_mul(&acc, &base_m, &m_limbs, n0);
        }
    }
    let out = mont_mul(&acc, &one, &m_limbs, n0);
    BigInt::from_sign_magnitude(false, out)
}

/// `-m0^-1 mod 2^64` by Newton iteration. An odd square is 1 mod 8, so
/// the seed is correct to 3 bits and five doublings reach 64.
fn mont_n0(m0: u64) -> u64 {
    let mut inv = m0;
    for _ in 0..5 {
        inv = inv.wrapping_mul(2u64.wrapping_sub(m0.wrapping_mul(inv)));
    }
    inv.wrapping_neg()
}

/// CIOS Montgomery multiplication: `a * b * R^-1 mod m` with
/// `R = 2^(64k)`; inputs and output are `k`-limb vectors below `m`.
fn mont_mul(a: &[u64], b: &[u64], m: &[u64], n0: u64) -> Vec<u64> {
    let k = m.len();
    let mut t = vec![0u64; k + 2];
    for i in 0..k {
        let bi = b[i];
        let mut carry = 0u64;
        for j in 0..k {
            let sum = t[j] as u128 + a[j] as u128 * bi as u128 + carry as u128;
            t[j] = sum as u64;
            carry = (sum >> 64) as u64;
        }
        let sum = t[k] as u128 + carry as u128;
        t[k] = sum as u64;
        t[k + 1] = (sum >> 64) as u64;

        let mu = t[0].wrapping_mul(n0);
        let sum = t[0] as u128 + mu as u128 * m[0] as u128;
        let mut carry = (sum >> 64) as u64;
        for j in 1..k {
            let sum = t[j] as u128 + mu as u128 * m[j] as u128 + carry as u128;
            t[j - 1] = sum as u64;
            carry = (sum >> 64) as u64;
        }
        let sum = t[k] as u128 + carry as u128;
        t[k - 1] = sum as u64;
        t[k] = t[k + 1] + (sum >> 64) as u64;
    }
    let overflow = t[k] != 0;
    t.truncate(k);
    if overflow || cmp_fixed(&t, m) != Ordering::Less {
        let mut borrow = 0u64;
        for j in 0..k {
            let (d1, b1) = t[j].overflowing_sub(m[j]);
            let (d2, b2) = d1.overflowing_sub(borrow);
            t[j] = d2;
            borrow = (b1 | b2) as u64;
        }
    }
    t
}

/// Compares equal-width limb vectors that may carry leading zeros.
fn cmp_fixed(a: &[u64], b: &[u64]) -> Ordering {
    debug_assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        match x.cmp(y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

fn to_limbs(value: &BigInt, k: usize) -> Vec<u64> {
    let mut buf = [0u64; 1];
    let (_, mag) = value.parts(&mut buf);
    debug_assert!(mag.len() <= k);
    let mut out = vec![0u64; k];
    out[..mag.len()].copy_from_slice(mag);
    out
}

/// Short division of a magnitude by a single limb.
pub(crate) fn div_rem_mag_u64(a: &[u64], d: u64) -> (Vec<u64>, u64) {
    debug_assert!(d != 0);
    let mut q = vec![0u64; a.len()];
    let mut r = 0u64;
    for i in (0..a.len()).rev() {
        let cur = (r as u128) << 64 | a[i] as u128;
        q[i] = (cur / d as u128) as u64;
        r = (cur % d as u128) as u64;
    }
    while q.last() == Some(&0) {
        q.pop();
    }
    (q, r)
}

/// Knuth's algorithm D. Preconditions: `v` has at least two limbs with a
/// non-zero top limb, and `u >= v`.
fn div_rem_mag(u: &[u64], v: &[u64]) -> (Vec<u64>, Vec<u64>) {
    let n = v.len();
    let m = u.len() - n;
    let shift = v[n - 1].leading_zeros() as usize;
    let vn = {
        let mut vn = shl_mag(v, shift);
        debug_assert_eq!(vn.len(), n);
        vn.resize(n, 0);
        vn
    };
    let mut un = shl_mag(u, shift);
    un.resize(u.len() + 1, 0);
    let mut q = vec![0u64; m + 1];

    for j in (0..=m).rev() {
        let num = (un[j + n] as u128) << 64 | un[j + n - 1] as u128;
        let mut qhat = num / vn[n - 1] as u128;
        let mut rhat = num % vn[n - 1] as u128;
        while qhat >> 64 != 0
            || qhat * vn[n - 2] as u128 > (rhat << 64 | un[j + n - 2] as u128)
        {
            qhat -= 1;
            rhat += vn[n - 1] as u128;
            if rhat >> 64 != 0 {
                break;
            }
        }

        // Multiply-subtract qhat * vn from un[j..=j+n].
        let mut mul_carry = 0u128;
        let mut borrow = 0i128;
        for i in 0..n {
            let product = qhat * vn[i] as u128 + mul_carry;
            mul_carry = product >> 64;
            let diff = un[j + i] as i128 - (product as u64) as i128 - borrow;
            if diff < 0 {
                un[j + i] = (diff + (1i128 << 64)) as u64;
                borrow = 1;
            } else {
                un[j + i] = diff as u64;
                borrow = 0;
            }
        }
        let diff = un[j + n] as i128 - mul_carry as i128 - borrow;
        if diff < 0 {
            // qhat overshot by one: add the divisor back.
            un[j + n] = (diff + (1i128 << 64)) as u64;
            qhat -= 1;
            let mut carry = 0u64;
            for i in 0..n {
                let sum = un[j + i] as u128 + vn[i] as u128 + carry as u128;
                un[j + i] = sum as u64;
                carry = (sum >> 64) as u64;
            }
            un[j + n] = un[j + n].wrapping_add(carry);
        } else {
            un[j + n] = diff as u64;
        }
        q[j] = qhat as u64;
    }

    while q.last() == Some(&0) {
        q.pop();
    }
    let r = shr_mag(&un[..n], shift);
    (q, r)
}
