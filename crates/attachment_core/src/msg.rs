#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User activated the trigger control.
    Pressed,
    /// One fetch of the current batch settled, successfully or not.
    FileSettled { archived: usize, total: usize },
    /// All batches are done; the archive is being finalised.
    CompressStarted,
    /// Archiving capability reported progress, in percent.
    CompressProgress(u8),
    /// The job ended, whatever the outcome.
    Finished,
}
