use attachment_engine::{EngineEvent, LogProgressSink, ProgressSink};
use engine_logging::engine_info;
use tokio::sync::mpsc::UnboundedReceiver;

/// Show engine events while jobs run and keep them for the report.
///
/// Ends once every sender is gone, that is when the downloader and its
/// trigger controls have been dropped.
pub async fn relay_events(mut events: UnboundedReceiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut seen = Vec::new();
    while let Some(event) = events.recv().await {
        show(&event);
        seen.push(event);
    }
    seen
}

fn show(event: &EngineEvent) {
    match event {
        EngineEvent::ControlChanged { control_id, view } => {
            engine_info!("{}: {}", control_id, view.label);
        }
        other => LogProgressSink.emit(other.clone()),
    }
}
