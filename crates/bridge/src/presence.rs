use record_bridge_stanza::Address;
use record_bridge_types::{ControllerStatus, PresenceState};

use crate::transport::SignalTransport;

/// Publish busy presence to the shared room. Idempotent; a failed send is
/// logged and swallowed.
pub fn publish_busy<T: SignalTransport>(transport: &mut T) {
    publish(transport, PresenceState::Busy);
}

/// Publish idle presence to the shared room. Idempotent; a failed send is
/// logged and swallowed.
pub fn publish_idle<T: SignalTransport>(transport: &mut T) {
    publish(transport, PresenceState::Idle);
}

fn publish<T: SignalTransport>(transport: &mut T, state: PresenceState) {
    tracing::info!(state = state.as_str(), "publishing presence");
    if let Err(e) = transport.send_presence(state) {
        tracing::warn!(state = state.as_str(), "failed to publish presence: {e:#}");
    }
}

/// Send a directed status update to the controller that admitted the current
/// recording. Skipped with a warning when no controller has been recorded
/// yet (a status event before any successful start).
pub fn send_controller_status<T: SignalTransport>(
    transport: &mut T,
    controller: Option<&Address>,
    status: ControllerStatus,
) {
    let Some(controller) = controller.filter(|c| !c.is_empty()) else {
        tracing::warn!(
            status = status.as_str(),
            "no controller recorded; dropping status update"
        );
        return;
    };
    tracing::info!(to = %controller, status = status.as_str(), "sending status update");
    if let Err(e) = transport.send_controller_status(controller, status) {
        tracing::warn!(to = %controller, "failed to send status update: {e:#}");
    }
}
