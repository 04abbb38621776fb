use crate::view_model::{
    compressing_progress_label, downloading_label, COMPRESSING_LABEL, WAITING_LABEL,
};
use crate::{ControlState, Effect, Msg};

/// Pure update function: applies a message to a control and returns any effects.
///
/// A disabled control ignores presses, which is what keeps a region from
/// running two jobs at once. Progress messages only apply while a job runs.
pub fn update(mut state: ControlState, msg: Msg) -> (ControlState, Vec<Effect>) {
    let effects = match msg {
        Msg::Pressed => {
            if !state.is_enabled() {
                return (state, Vec::new());
            }
            state.disable();
            state.set_label(WAITING_LABEL.to_string());
            vec![Effect::StartJob]
        }
        Msg::FileSettled { archived, total } => {
            if !state.is_enabled() {
                state.set_label(downloading_label(archived.min(total), total));
            }
            Vec::new()
        }
        Msg::CompressStarted => {
            if !state.is_enabled() {
                state.set_label(COMPRESSING_LABEL.to_string());
            }
            Vec::new()
        }
        Msg::CompressProgress(percent) => {
            if !state.is_enabled() {
                state.set_label(compressing_progress_label(percent.min(100)));
            }
            Vec::new()
        }
        Msg::Finished => {
            state.reset();
            Vec::new()
        }
    };

    (state, effects)
}
