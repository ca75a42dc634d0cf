//! SHAKE128 extendable-output function.

use super::{Domain, Sponge};

/// SHAKE128: a 256-bit-capacity Keccak sponge with the SHAKE domain
/// padding, squeezing any number of output bytes.
#[derive(Clone)]
pub struct Shake128(Sponge);

impl Shake128 {
    /// Creates a fresh absorbing instance.
    pub fn new() -> Self {
        Shake128(Sponge::new(256))
    }

    /// Absorbs input bytes.
    ///
    /// # Panics
    ///
    /// Panics if called after [`Shake128::flip`].
    pub fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    /// Finishes absorbing and switches to output mode.
    ///
    /// # Panics
    ///
    /// Panics if called twice without a reset.
    pub fn flip(&mut self) {
        self.0.flip(Domain::Shake);
    }

    /// Produces the next `out.len()` output bytes.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Shake128::flip`].
    pub fn next(&mut self, out: &mut [u8]) {
        self.0.next(out);
    }

    /// Clears all state for reuse.
    pub fn reset(&mut self) {
        self.0.reset();
    }
}

impl Default for Shake128 {
    fn default() -> Self {
        Self::new()
    }
}
