use anyhow::{Context, Result};
use crossbeam_channel::Receiver;

use record_bridge_types::{ControllerStatus, WorkerEvent};

use crate::channel::{EventReceiver, WorkerEvents, command_channel};
use crate::config::BridgeConfig;
use crate::control::{ControlHandler, WorkerCall};
use crate::lock::StatusLock;
use crate::presence;
use crate::transport::SignalTransport;
use crate::worker::RecordingWorker;

/// Owns one bridge lifecycle: room join, initial idle presence, then the
/// single-threaded control loop until the shutdown sentinel arrives.
///
/// Per loop tick: at most one inbound request is handled (with local
/// containment), pending worker calls are drained, and at most one worker
/// event is consumed. All state mutation happens on the thread running
/// [`BridgeSession::run`].
pub struct BridgeSession<T, W> {
    config: BridgeConfig,
    transport: T,
    worker: W,
    handler: ControlHandler,
    events: EventReceiver,
    calls: Receiver<WorkerCall>,
}

impl<T: SignalTransport, W: RecordingWorker> BridgeSession<T, W> {
    /// Build a session and the event handle the recording worker reports
    /// through. The handle is clonable and safe to use from any thread.
    pub fn new(config: BridgeConfig, transport: T, worker: W) -> (Self, WorkerEvents) {
        let (events_tx, events_rx) = command_channel();
        let session = Self::from_parts(config, transport, worker, events_rx);
        (session, events_tx)
    }

    /// Build a session over an externally created command channel, for
    /// embedders that hand the producer side out before the transport exists.
    pub fn from_parts(config: BridgeConfig, transport: T, worker: W, events: EventReceiver) -> Self {
        let (calls_tx, calls_rx) = crossbeam_channel::unbounded();
        BridgeSession {
            config,
            transport,
            worker,
            handler: ControlHandler::new(StatusLock::new(), calls_tx),
            events,
            calls: calls_rx,
        }
    }

    /// Run the session to completion. Returns once the shutdown sentinel is
    /// consumed; only a failed room join is fatal up front.
    pub fn run(mut self) -> Result<()> {
        self.transport
            .join_room(&self.config.room)
            .with_context(|| format!("join room {}", self.config.room.room))?;
        tracing::info!(room = %self.config.room.room, nick = %self.config.room.nick, "joined room");
        presence::publish_idle(&mut self.transport);

        loop {
            match self.transport.poll_request(self.config.poll_interval) {
                Ok(Some(request)) => self.handler.handle(request, &mut self.transport),
                Ok(None) => {}
                Err(e) => tracing::warn!("transport poll error: {e:#}"),
            }

            self.drain_worker_calls();

            if let Some(event) = self.events.poll_one() {
                if !self.dispatch(event) {
                    break;
                }
            }
        }

        if let Err(e) = self.transport.leave() {
            tracing::warn!("failed to leave room: {e:#}");
        }
        tracing::info!("session terminated");
        Ok(())
    }

    /// Apply one worker event. Returns `false` when the session should stop.
    fn dispatch(&mut self, event: WorkerEvent) -> bool {
        tracing::info!(?event, "worker event");
        match event {
            WorkerEvent::Shutdown => return false,
            WorkerEvent::Idle => presence::publish_idle(&mut self.transport),
            WorkerEvent::Busy => presence::publish_busy(&mut self.transport),
            WorkerEvent::StatusOff => self.controller_status(ControllerStatus::Off),
            WorkerEvent::StatusOn | WorkerEvent::Started => {
                self.controller_status(ControllerStatus::On)
            }
            WorkerEvent::Stopped => {
                self.handler.release_admission();
                self.controller_status(ControllerStatus::Off);
            }
        }
        true
    }

    fn controller_status(&mut self, status: ControllerStatus) {
        presence::send_controller_status(&mut self.transport, self.handler.controller(), status);
    }

    fn drain_worker_calls(&mut self) {
        while let Ok(call) = self.calls.try_recv() {
            match call {
                WorkerCall::Start {
                    url,
                    follow_entity,
                    stream_id,
                } => {
                    tracing::info!(stream_id = %stream_id, url = %url, "starting recording");
                    if let Err(e) =
                        self.worker
                            .start_recording(&url, follow_entity.as_deref(), &stream_id)
                    {
                        tracing::error!(stream_id = %stream_id, "failed to start recording: {e:#}");
                    }
                }
                WorkerCall::Stop(reason) => {
                    tracing::info!(reason = reason.as_str(), "stopping recording");
                    if let Err(e) = self.worker.stop_recording(reason) {
                        tracing::error!(reason = reason.as_str(), "failed to stop recording: {e:#}");
                    }
                }
            }
        }
    }
}
