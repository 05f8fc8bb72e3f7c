use serde::{Deserialize, Serialize};
use sparkwire_shared::{BincodeCodec, ChannelId, HasChannelId};

use crate::Database;

/// Stand-in for the channel state produced by the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TestChannel {
    pub id: ChannelId,
    pub local_balance_msat: u64,
    pub commitment_number: u64,
    pub extra: Vec<u8>,
}

impl HasChannelId for TestChannel {
    fn channel_id(&self) -> ChannelId {
        self.id
    }
}

pub(crate) type TestCodec = BincodeCodec<TestChannel>;

pub(crate) fn channel(byte: u8, balance: u64) -> TestChannel {
    TestChannel {
        id: ChannelId([byte; 32]),
        local_balance_msat: balance,
        commitment_number: 0,
        extra: vec![byte; 4],
    }
}

pub(crate) fn db() -> Database {
    Database::open_in_memory().expect("in-memory database")
}
