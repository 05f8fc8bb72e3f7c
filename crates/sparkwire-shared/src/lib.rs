//! # sparkwire-shared
//!
//! Types shared by every sparkwire crate: channel and payment identifiers,
//! the codec seam between live channel state and stored bytes, and a few
//! constants.

pub mod codec;
pub mod constants;
pub mod error;
pub mod types;

pub use codec::{BincodeCodec, ChannelCodec, HasChannelId};
pub use error::CodecError;
pub use types::{ChannelId, CltvExpiry, PaymentHash};
