//! The boundary between live channel state and the bytes the store persists.
//!
//! The store never looks inside a channel blob. It only needs the channel's
//! identifier (via [`HasChannelId`]) and a [`ChannelCodec`] to cross the
//! boundary in both directions.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;
use crate::types::ChannelId;

/// Anything that knows which channel it describes.
pub trait HasChannelId {
    fn channel_id(&self) -> ChannelId;
}

/// Converts channel state to an opaque byte sequence and back.
///
/// `decode(encode(s))` must yield a value equal to `s`.
pub trait ChannelCodec {
    type State: HasChannelId;

    fn encode(&self, state: &Self::State) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<Self::State, CodecError>;
}

/// A [`ChannelCodec`] for any serde-serializable state, using bincode.
pub struct BincodeCodec<S> {
    _state: PhantomData<fn() -> S>,
}

impl<S> BincodeCodec<S> {
    pub fn new() -> Self {
        Self {
            _state: PhantomData,
        }
    }
}

impl<S> Default for BincodeCodec<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for BincodeCodec<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for BincodeCodec<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BincodeCodec")
    }
}

impl<S> ChannelCodec for BincodeCodec<S>
where
    S: Serialize + DeserializeOwned + HasChannelId,
{
    type State = S;

    fn encode(&self, state: &S) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(state).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<S, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}
