use serde::{Deserialize, Serialize};

macro_rules! bytes32_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                let mut arr = [0u8; 32];
                hex::decode_to_slice(s.trim(), &mut arr)?;
                Ok(Self(arr))
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }
    };
}

bytes32_id!(
    /// Identifier of a payment channel (32 bytes).
    ChannelId
);

bytes32_id!(
    /// Hash identifying an in-flight HTLC.
    PaymentHash
);

/// Absolute block height at which an HTLC expires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CltvExpiry(pub u32);

impl CltvExpiry {
    pub fn height(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CltvExpiry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
