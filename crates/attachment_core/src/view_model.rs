pub const WAITING_LABEL: &str = "Waiting...";
pub const COMPRESSING_LABEL: &str = "Compressing...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub enabled: bool,
    pub label: String,
}

pub(crate) fn downloading_label(archived: usize, total: usize) -> String {
    format!("Downloading ({archived}/{total})")
}

pub(crate) fn compressing_progress_label(percent: u8) -> String {
    format!("Compressing ({percent})%")
}
