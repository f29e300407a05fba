use anyhow::Result;

use record_bridge_types::StopReason;

/// Entry points into the out-of-process recording controller.
///
/// Both are invoked only on the bridge's control thread and must return
/// promptly; actual capture start/stop is asynchronous, reported back through
/// the command channel as [`record_bridge_types::WorkerEvent`]s.
pub trait RecordingWorker {
    fn start_recording(
        &mut self,
        url: &str,
        follow_entity: Option<&str>,
        stream_id: &str,
    ) -> Result<()>;

    fn stop_recording(&mut self, reason: StopReason) -> Result<()>;
}
