#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid modulus: {0}")]
    InvalidModulus(String),

    #[error("Invalid integer literal: {0}")]
    InvalidLiteral(String),

    #[error("Counter {found} exceeds the configured decompression cap {limit}")]
    CounterCap { found: u128, limit: u128 },

    #[error("Corrupt DEFLATE payload: {0}")]
    Deflate(#[from] std::io::Error),
}
