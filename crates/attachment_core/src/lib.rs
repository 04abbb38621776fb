//! Attachment core: pure extraction, naming and trigger-control state machine.
mod batch;
mod config;
mod effect;
mod extract;
mod msg;
mod naming;
mod state;
mod update;
mod view_model;

pub use batch::{plan_download, DownloadPlan, BATCH_SIZE};
pub use config::{DownloaderConfig, DEFAULT_BUTTON_TEXT};
pub use effect::Effect;
pub use extract::{
    extract_attachments, file_extension, AttachmentRef, ATTACHMENT_PATH_MARKER, DEFAULT_EXTENSION,
};
pub use msg::Msg;
pub use naming::{archive_filename, attachment_filename};
pub use state::ControlState;
pub use update::update;
pub use view_model::{ControlView, COMPRESSING_LABEL, WAITING_LABEL};
