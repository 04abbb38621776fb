#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The control accepted the press; a download job must run for its region.
    StartJob,
}
