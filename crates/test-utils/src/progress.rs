use buffspawn::{Channel, Progress, ProgressSink};
use tokio::sync::mpsc;

/// Collects progress events so tests can inspect them after a run.
pub struct ProgressRecorder {
    rx: mpsc::UnboundedReceiver<Progress>,
}

impl ProgressRecorder {
    /// A recorder and the sink to hand to the executor.
    pub fn new() -> (Self, ProgressSink) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, tx)
    }

    /// Drain every event sent so far (the sink must have been dropped or the
    /// run completed for this to be the full set).
    pub fn events(&mut self) -> Vec<Progress> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Concatenation of all chunks seen on `channel`, in arrival order.
    pub fn joined(events: &[Progress], channel: Channel) -> Vec<u8> {
        events
            .iter()
            .filter(|e| e.channel == channel)
            .flat_map(|e| e.chunk.iter().copied())
            .collect()
    }
}
