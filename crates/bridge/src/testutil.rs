use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};

use record_bridge_stanza::{Address, ControlAction, ControlReply, ControlRequest, RequestId};
use record_bridge_types::{ControllerStatus, PresenceState, StopReason};

use crate::channel::WorkerEvents;
use crate::config::RoomConfig;
use crate::transport::SignalTransport;
use crate::worker::RecordingWorker;

/// Opt-in log output for tests: `RUST_LOG=debug cargo test -- --nocapture`.
pub(crate) fn init_test_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_test_writer()
        .try_init();
}

pub(crate) fn control_request(id: &str, from: &str, action: ControlAction) -> ControlRequest {
    ControlRequest {
        from: Address::new(from),
        id: RequestId::new(id),
        action,
        stream_id: None,
        url: None,
        follow_entity: None,
    }
}

/// Start request; empty strings stand in for absent attributes.
pub(crate) fn start_request(id: &str, from: &str, stream_id: &str, url: &str) -> ControlRequest {
    ControlRequest {
        stream_id: Some(stream_id.to_string()),
        url: Some(url.to_string()),
        ..control_request(id, from, ControlAction::Start)
    }
}

#[derive(Debug, Default)]
pub(crate) struct TransportLog {
    pub joined: Vec<String>,
    pub replies: Vec<ControlReply>,
    pub presences: Vec<PresenceState>,
    pub statuses: Vec<(String, ControllerStatus)>,
    pub left: bool,
}

/// Scripted transport: serves queued inbound requests, records everything
/// sent, and can optionally fail sends/polls or signal shutdown once the
/// inbound script is drained (so session tests terminate).
pub(crate) struct FakeTransport {
    pub inbound: VecDeque<ControlRequest>,
    log: Arc<Mutex<TransportLog>>,
    fail_sends: bool,
    fail_join: bool,
    poll_errors: usize,
    shutdown_when_drained: Option<WorkerEvents>,
}

impl FakeTransport {
    pub fn new() -> Self {
        FakeTransport {
            inbound: VecDeque::new(),
            log: Arc::new(Mutex::new(TransportLog::default())),
            fail_sends: false,
            fail_join: false,
            poll_errors: 0,
            shutdown_when_drained: None,
        }
    }

    pub fn log(&self) -> Arc<Mutex<TransportLog>> {
        self.log.clone()
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn failing_join(mut self) -> Self {
        self.fail_join = true;
        self
    }

    pub fn with_poll_errors(mut self, count: usize) -> Self {
        self.poll_errors = count;
        self
    }

    pub fn with_inbound(mut self, requests: impl IntoIterator<Item = ControlRequest>) -> Self {
        self.inbound.extend(requests);
        self
    }

    pub fn shutdown_when_drained(mut self, events: WorkerEvents) -> Self {
        self.shutdown_when_drained = Some(events);
        self
    }
}

impl SignalTransport for FakeTransport {
    fn join_room(&mut self, room: &RoomConfig) -> Result<()> {
        if self.fail_join {
            return Err(anyhow!("room unreachable"));
        }
        self.log.lock().unwrap().joined.push(room.room.to_string());
        Ok(())
    }

    fn poll_request(&mut self, _timeout: Duration) -> Result<Option<ControlRequest>> {
        if self.poll_errors > 0 {
            self.poll_errors -= 1;
            return Err(anyhow!("stream hiccup"));
        }
        match self.inbound.pop_front() {
            Some(request) => Ok(Some(request)),
            None => {
                if let Some(events) = self.shutdown_when_drained.take() {
                    events.shutdown();
                }
                Ok(None)
            }
        }
    }

    fn send_reply(&mut self, reply: &ControlReply) -> Result<()> {
        if self.fail_sends {
            return Err(anyhow!("send failed"));
        }
        self.log.lock().unwrap().replies.push(reply.clone());
        Ok(())
    }

    fn send_presence(&mut self, state: PresenceState) -> Result<()> {
        if self.fail_sends {
            return Err(anyhow!("send failed"));
        }
        self.log.lock().unwrap().presences.push(state);
        Ok(())
    }

    fn send_controller_status(&mut self, to: &Address, status: ControllerStatus) -> Result<()> {
        if self.fail_sends {
            return Err(anyhow!("send failed"));
        }
        self.log
            .lock()
            .unwrap()
            .statuses
            .push((to.to_string(), status));
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        self.log.lock().unwrap().left = true;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct WorkerLog {
    pub starts: Vec<(String, Option<String>, String)>,
    pub stops: Vec<StopReason>,
}

pub(crate) struct FakeWorker {
    log: Arc<Mutex<WorkerLog>>,
    fail: bool,
}

impl FakeWorker {
    pub fn new() -> Self {
        FakeWorker {
            log: Arc::new(Mutex::new(WorkerLog::default())),
            fail: false,
        }
    }

    pub fn log(&self) -> Arc<Mutex<WorkerLog>> {
        self.log.clone()
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl RecordingWorker for FakeWorker {
    fn start_recording(
        &mut self,
        url: &str,
        follow_entity: Option<&str>,
        stream_id: &str,
    ) -> Result<()> {
        if self.fail {
            return Err(anyhow!("worker refused"));
        }
        self.log.lock().unwrap().starts.push((
            url.to_string(),
            follow_entity.map(str::to_string),
            stream_id.to_string(),
        ));
        Ok(())
    }

    fn stop_recording(&mut self, reason: StopReason) -> Result<()> {
        if self.fail {
            return Err(anyhow!("worker refused"));
        }
        self.log.lock().unwrap().stops.push(reason);
        Ok(())
    }
}
