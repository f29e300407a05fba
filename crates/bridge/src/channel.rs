use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use record_bridge_types::WorkerEvent;

/// Build the command channel: a clonable producer handle for the worker side
/// and the consumer end polled by the control thread.
pub fn command_channel() -> (WorkerEvents, EventReceiver) {
    let (tx, rx) = unbounded();
    (WorkerEvents { tx }, EventReceiver { rx })
}

/// Producer handle the recording worker reports through. Callable from any
/// thread; sends are best-effort and never block.
#[derive(Clone, Debug)]
pub struct WorkerEvents {
    tx: Sender<WorkerEvent>,
}

impl WorkerEvents {
    pub fn send(&self, event: WorkerEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!(?event, "command channel closed; event dropped");
        }
    }

    /// Ask the bridge session to terminate cleanly.
    pub fn shutdown(&self) {
        self.send(WorkerEvent::Shutdown);
    }
}

/// Consumer end, owned by the bridge session.
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<WorkerEvent>,
}

impl EventReceiver {
    /// Take at most one pending event; never blocks. An empty channel is the
    /// steady state of each tick, not an error. A disconnected channel reads
    /// as a shutdown so an exiting worker tears the session down with it.
    pub fn poll_one(&self) -> Option<WorkerEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(WorkerEvent::Shutdown),
        }
    }
}
