#![no_main]

use libfuzzer_sys::fuzz_target;
use paradox::BigInt;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = core::str::from_utf8(data) {
        for radix in [2u32, 10, 16, 36] {
            if let Ok(value) = BigInt::from_str_radix(text, radix) {
                assert_eq!(
                    BigInt::from_str_radix(&value.to_str_radix(radix), radix).unwrap(),
                    value
                );
            }
        }
        let _ = text.parse::<BigInt>();
    }
    let _ = BigInt::from_bytes_be_signed(data);
    let _ = BigInt::from_bytes_le(data);
});
