use std::time::Duration;

use anyhow::Result;

use record_bridge_stanza::{Address, ControlReply, ControlRequest};
use record_bridge_types::{ControllerStatus, PresenceState};

use crate::config::RoomConfig;

/// Narrow seam to the chat/presence transport.
///
/// Implementations own authentication, reconnect, stream framing, and the
/// stanza wire shape (see `record-bridge-stanza` for the mapping); the bridge
/// only ever sees typed requests and hands back typed replies. All methods
/// are called from the control thread.
pub trait SignalTransport {
    /// Join the shared room and announce the configured nick.
    fn join_room(&mut self, room: &RoomConfig) -> Result<()>;

    /// Wait up to `timeout` for one inbound control request. `Ok(None)` on
    /// timeout; decode failures for foreign stanzas are the implementation's
    /// problem and must not surface here.
    fn poll_request(&mut self, timeout: Duration) -> Result<Option<ControlRequest>>;

    fn send_reply(&mut self, reply: &ControlReply) -> Result<()>;

    /// Publish availability to the shared room.
    fn send_presence(&mut self, state: PresenceState) -> Result<()>;

    /// Send a directed status update to the controller.
    fn send_controller_status(&mut self, to: &Address, status: ControllerStatus) -> Result<()>;

    fn leave(&mut self) -> Result<()>;
}
