use std::time::Duration;

use record_bridge_stanza::Address;

/// Tick between command-channel polls while no stanza is pending.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Shared room the bridge joins and publishes presence into.
#[derive(Clone, Debug)]
pub struct RoomConfig {
    pub room: Address,
    pub nick: String,
    pub password: Option<String>,
}

#[derive(Clone, Debug)]
pub struct BridgeConfig {
    pub room: RoomConfig,
    pub poll_interval: Duration,
}

impl BridgeConfig {
    pub fn new(room: RoomConfig) -> Self {
        BridgeConfig {
            room,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}
