use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use attachment_engine::{decode_page, Fetcher};
use engine_logging::engine_info;
use url::Url;

/// Where the page to scan comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    File(PathBuf),
    Remote(Url),
}

impl PageSource {
    /// `http` and `https` URLs are fetched, everything else is a file path.
    pub fn parse(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => PageSource::Remote(url),
            _ => PageSource::File(PathBuf::from(value)),
        }
    }

    /// Base for relative links found on the page.
    pub fn base_url(&self) -> Option<Url> {
        match self {
            PageSource::Remote(url) => Some(url.clone()),
            PageSource::File(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub html: String,
}

pub async fn load_page(source: &PageSource, fetcher: &dyn Fetcher) -> anyhow::Result<LoadedPage> {
    let (bytes, content_type) = match source {
        PageSource::File(path) => {
            let bytes = fs::read(path).with_context(|| format!("failed to read page {:?}", path))?;
            (bytes, None)
        }
        PageSource::Remote(url) => {
            let output = fetcher
                .fetch(url.as_str())
                .await
                .with_context(|| format!("failed to fetch page {url}"))?;
            (output.bytes.to_vec(), output.metadata.content_type)
        }
    };

    let decoded = decode_page(&bytes, content_type.as_deref())?;
    engine_info!(
        "Loaded page ({} bytes, {})",
        bytes.len(),
        decoded.encoding_label
    );
    Ok(LoadedPage { html: decoded.html })
}
