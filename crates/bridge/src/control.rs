use crossbeam_channel::Sender;

use record_bridge_stanza::{
    Address, ControlAction, ControlReply, ControlRequest, ErrorCondition, StateHint,
};
use record_bridge_types::StopReason;

use crate::lock::{AdmissionToken, StatusLock};
use crate::presence;
use crate::transport::SignalTransport;

/// Invocation of a worker entry point, handed off from stanza handling to the
/// control loop's drain pass. The reply for the triggering request is always
/// on the wire before the call is enqueued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkerCall {
    Start {
        url: String,
        follow_entity: Option<String>,
        stream_id: String,
    },
    Stop(StopReason),
}

/// Control-stanza state machine and admission gate.
///
/// Every request is evaluated fresh against the lock; there is no persisted
/// error state. Errors in replying never propagate: a delivery failure is
/// logged and the state change it acknowledged stands.
pub struct ControlHandler {
    lock: StatusLock,
    token: Option<AdmissionToken>,
    controller: Option<Address>,
    calls: Sender<WorkerCall>,
}

impl ControlHandler {
    pub fn new(lock: StatusLock, calls: Sender<WorkerCall>) -> Self {
        ControlHandler {
            lock,
            token: None,
            controller: None,
            calls,
        }
    }

    /// The remote party that most recently admitted a recording, if any.
    pub fn controller(&self) -> Option<&Address> {
        self.controller.as_ref()
    }

    /// Free the admission slot. Idempotent: a worker-reported stop may race
    /// teardown, and releasing twice is a no-op.
    pub fn release_admission(&mut self) {
        match self.token.take() {
            Some(token) => token.release(),
            None => self.lock.release(),
        }
    }

    /// Process one inbound control request: send the protocol reply, then
    /// apply the admission decision and enqueue the worker call.
    pub fn handle<T: SignalTransport>(&mut self, request: ControlRequest, transport: &mut T) {
        tracing::info!(
            from = %request.from,
            id = %request.id,
            action = %request.action,
            "control request"
        );
        match &request.action {
            ControlAction::Start => self.handle_start(request, transport),
            ControlAction::Stop => {
                // Idempotent: stopping an idle instance is not an error.
                send_reply(transport, ControlReply::result(&request, StateHint::Stopping));
                tracing::info!("stopping");
                self.schedule(WorkerCall::Stop(StopReason::ControlStop));
            }
            ControlAction::Other(raw) => {
                tracing::error!(action = %raw, "action not implemented");
                send_reply(
                    transport,
                    ControlReply::error(
                        &request,
                        ErrorCondition::NotImplemented,
                        "Action not implemented.",
                    ),
                );
            }
        }
    }

    fn handle_start<T: SignalTransport>(&mut self, request: ControlRequest, transport: &mut T) {
        let Some(token) = self.lock.try_acquire() else {
            send_reply(
                transport,
                ControlReply::error(
                    &request,
                    ErrorCondition::ServiceUnavailable,
                    "Instance already in use.",
                )
                .with_code(503),
            );
            return;
        };

        // Field validation happens after admission; a failure here must give
        // the slot back or admission wedges until restart.
        let Some(stream_id) = non_blank(request.stream_id.as_deref()) else {
            send_reply(
                transport,
                ControlReply::error(&request, ErrorCondition::BadRequest, "No stream-id."),
            );
            token.release();
            return;
        };
        let Some(url) = non_blank(request.url.as_deref()) else {
            send_reply(
                transport,
                ControlReply::error(&request, ErrorCondition::BadRequest, "No URL."),
            );
            token.release();
            return;
        };
        let stream_id = stream_id.to_string();
        let url = url.to_string();

        send_reply(transport, ControlReply::result(&request, StateHint::Pending));
        self.token = Some(token);
        self.controller = Some(request.from.clone());
        presence::publish_busy(transport);
        self.schedule(WorkerCall::Start {
            url,
            follow_entity: request.follow_entity,
            stream_id,
        });
    }

    fn schedule(&self, call: WorkerCall) {
        if self.calls.send(call).is_err() {
            tracing::warn!("worker call channel closed; call dropped");
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn send_reply<T: SignalTransport>(transport: &mut T, reply: ControlReply) {
    if let Err(e) = transport.send_reply(&reply) {
        tracing::warn!(to = %reply.to, id = %reply.id, "failed to send reply: {e:#}");
    }
}
