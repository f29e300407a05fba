use serde::{Deserialize, Serialize};

/// Signal reported by the recording worker into the bridge's command channel.
///
/// Events are produced from the worker side (any thread) and consumed strictly
/// in arrival order, one per poll tick, on the bridge's control thread.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkerEvent {
    /// Worker is idle; bridge should publish idle presence.
    Idle,
    /// Worker is busy; bridge should publish busy presence.
    Busy,
    /// Send a controller-directed "off" status update.
    StatusOff,
    /// Send a controller-directed "on" status update.
    StatusOn,
    /// Recording reached a terminal stop; the admission slot frees up.
    Stopped,
    /// Recording actually started on the worker side.
    Started,
    /// Sentinel: terminate the bridge session cleanly.
    Shutdown,
}

/// The bridge's own published availability in the shared room.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresenceState {
    #[default]
    Idle,
    Busy,
}

impl PresenceState {
    pub fn as_str(self) -> &'static str {
        match self {
            PresenceState::Idle => "idle",
            PresenceState::Busy => "busy",
        }
    }
}

/// Payload of a status update addressed directly to the controller.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ControllerStatus {
    On,
    Off,
}

impl ControllerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ControllerStatus::On => "on",
            ControllerStatus::Off => "off",
        }
    }
}

/// Why `stop_recording` is being invoked on the worker.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A remote party asked us to stop over the control protocol.
    ControlStop,
    /// The bridge session is tearing down.
    Teardown,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::ControlStop => "control_stop",
            StopReason::Teardown => "teardown",
        }
    }
}
