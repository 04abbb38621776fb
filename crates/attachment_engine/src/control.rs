use std::sync::{Arc, Mutex, PoisonError};

use attachment_core::{update, ControlState, ControlView, Effect, Msg};

use crate::{EngineEvent, ProgressSink, Region};

/// The trigger control wired into one region.
pub struct TriggerControl {
    id: String,
    region: Region,
    state: Mutex<ControlState>,
    events: Arc<dyn ProgressSink>,
}

impl TriggerControl {
    pub(crate) fn new(region: Region, label: &str, events: Arc<dyn ProgressSink>) -> Self {
        Self {
            id: control_id(region.index),
            region,
            state: Mutex::new(ControlState::new(label)),
            events,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn view(&self) -> ControlView {
        self.lock().view()
    }

    /// Disable the control for a new job. `None` when a job is already running.
    pub(crate) fn press(&self) -> Option<JobGuard<'_>> {
        self.apply(Msg::Pressed)
            .contains(&Effect::StartJob)
            .then_some(JobGuard { control: self })
    }

    fn apply(&self, msg: Msg) -> Vec<Effect> {
        let (view, effects) = {
            let mut guard = self.lock();
            let (mut next, effects) = update(guard.clone(), msg);
            let view = next.consume_dirty().then(|| next.view());
            *guard = next;
            (view, effects)
        };
        if let Some(view) = view {
            self.events.emit(EngineEvent::ControlChanged {
                control_id: self.id.clone(),
                view,
            });
        }
        effects
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ControlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TriggerControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerControl")
            .field("id", &self.id)
            .field("region", &self.region)
            .field("view", &self.view())
            .finish()
    }
}

/// Held for the duration of one job; dropping it re-enables the control and
/// restores its idle label, on every exit path.
pub(crate) struct JobGuard<'a> {
    control: &'a TriggerControl,
}

impl JobGuard<'_> {
    pub(crate) fn report(&self, msg: Msg) {
        self.control.apply(msg);
    }
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        self.control.apply(Msg::Finished);
    }
}

pub fn control_id(region_index: usize) -> String {
    format!("download-{region_index}")
}
