use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::naming::attachment_filename;

/// Substring every attachment href contains.
pub const ATTACHMENT_PATH_MARKER: &str = "/portal/file/";

/// Extension used when none can be read from the URL.
pub const DEFAULT_EXTENSION: &str = "bin";

static EXTENSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)\.([a-z]+)[0-9]*(?:[?#]|$)").expect("extension pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentRef {
    pub url: String,
    pub filename: String,
}

/// Scan candidate hrefs in document order and keep the attachment links.
///
/// Numbering restarts at 1 for every call, so names are unique within one
/// scan only.
pub fn extract_attachments<'a, I>(hrefs: I) -> Vec<AttachmentRef>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut refs: Vec<AttachmentRef> = Vec::new();
    for href in hrefs {
        if href.is_empty() || !href.contains(ATTACHMENT_PATH_MARKER) {
            continue;
        }
        let filename = attachment_filename(refs.len() + 1, &file_extension(href));
        refs.push(AttachmentRef {
            url: href.to_string(),
            filename,
        });
    }
    refs
}

/// Guess the extension of `url`: letters right after a dot, optionally
/// followed by digits, then a `?`/`#` or the end of the string.
pub fn file_extension(url: &str) -> String {
    EXTENSION_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
