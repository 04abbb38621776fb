use engine_logging::{engine_debug, engine_trace};
use tokio::sync::mpsc::UnboundedSender;

use crate::EngineEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Forwards every event to a channel; the receiver decides what to show.
pub struct ChannelProgressSink {
    tx: UnboundedSender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Default sink: events only end up in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::ControlChanged { control_id, view } => {
                engine_trace!(
                    "{} enabled={} label={:?}",
                    control_id,
                    view.enabled,
                    view.label
                );
            }
            EngineEvent::ArchiveProgress { region, percent } => {
                engine_trace!(region = region; "archive {}%", percent);
            }
            other => engine_debug!("{:?}", other),
        }
    }
}
