#![no_main]

use libfuzzer_sys::fuzz_target;
use paradox::{Codec, Modulus};

fuzz_target!(|data: &[u8]| {
    let codec = Codec::new(Modulus::default_2048());
    // Arbitrary bytes must never panic: they either pass through, inflate,
    // or surface a deflate error.
    let _ = codec.decompress(data);
});
