use crate::view_model::ControlView;

/// Enabled flag and label of one region's trigger control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    enabled: bool,
    label: String,
    idle_label: String,
    dirty: bool,
}

impl ControlState {
    pub fn new(idle_label: impl Into<String>) -> Self {
        let idle_label = idle_label.into();
        Self {
            enabled: true,
            label: idle_label.clone(),
            idle_label,
            dirty: false,
        }
    }

    pub fn view(&self) -> ControlView {
        ControlView {
            enabled: self.enabled,
            label: self.label.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_label(&mut self, label: String) {
        if self.label != label {
            self.label = label;
            self.dirty = true;
        }
    }

    pub(crate) fn disable(&mut self) {
        if self.enabled {
            self.enabled = false;
            self.dirty = true;
        }
    }

    pub(crate) fn reset(&mut self) {
        if !self.enabled {
            self.enabled = true;
            self.dirty = true;
        }
        let idle = self.idle_label.clone();
        self.set_label(idle);
    }
}
