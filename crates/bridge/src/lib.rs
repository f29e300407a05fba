//! Recording signaling bridge.
//!
//! Sits between a multi-party chat room and an out-of-process recording
//! worker: control requests arrive as typed stanzas, at most one recording is
//! admitted at a time, and worker state is reflected back out as presence and
//! controller-directed status updates.
//!
//! ## Threads
//! Everything mutable lives on one control thread: [`session::BridgeSession`]
//! polls the transport for requests, drains worker calls, and consumes one
//! worker event per tick. The worker process only ever writes into the
//! command channel ([`channel::WorkerEvents`], callable from any thread); the
//! admission gate ([`lock::StatusLock`]) is the single concurrency-safe
//! primitive so `try_acquire` needs no caller-side coordination.

pub mod channel;
pub mod config;
pub mod control;
pub mod lock;
pub mod presence;
pub mod session;
pub mod transport;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;
