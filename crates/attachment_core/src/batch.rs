use crate::AttachmentRef;

/// Upper bound on fetches in flight for one job. Batches run one after another.
pub const BATCH_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadPlan {
    /// Nothing to download; the trigger just resets.
    Nothing,
    /// A single file handed straight to the download sink.
    Direct(AttachmentRef),
    /// Several files fetched batch by batch and bundled into one archive.
    Archive(Vec<Vec<AttachmentRef>>),
}

impl DownloadPlan {
    pub fn file_count(&self) -> usize {
        match self {
            DownloadPlan::Nothing => 0,
            DownloadPlan::Direct(_) => 1,
            DownloadPlan::Archive(batches) => batches.iter().map(Vec::len).sum(),
        }
    }
}

pub fn plan_download(mut refs: Vec<AttachmentRef>) -> DownloadPlan {
    match refs.len() {
        0 => DownloadPlan::Nothing,
        1 => DownloadPlan::Direct(refs.remove(0)),
        _ => DownloadPlan::Archive(refs.chunks(BATCH_SIZE).map(<[_]>::to_vec).collect()),
    }
}
