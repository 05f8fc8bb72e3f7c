use thiserror::Error;

/// Errors raised while turning live channel state into stored bytes and back.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to encode channel state: {0}")]
    Encode(String),

    #[error("Failed to decode channel state: {0}")]
    Decode(String),
}
