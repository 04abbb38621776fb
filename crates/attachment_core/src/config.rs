use serde::{Deserialize, Serialize};

pub const DEFAULT_BUTTON_TEXT: &str = "Download Attachments";

/// Options recognised when wiring trigger controls into a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloaderConfig {
    /// Selector for each region root. Required.
    pub table_selector: Option<String>,
    /// Selector for the per-region label used to name archives.
    pub national_code_selector: Option<String>,
    /// Label of idle trigger controls.
    pub button_text: String,
    /// Selector, relative to a region, of the element the trigger is inserted into.
    pub button_position_selector: Option<String>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            table_selector: None,
            national_code_selector: None,
            button_text: DEFAULT_BUTTON_TEXT.to_string(),
            button_position_selector: None,
        }
    }
}

impl DownloaderConfig {
    pub fn new(table_selector: impl Into<String>, button_position_selector: impl Into<String>) -> Self {
        Self {
            table_selector: Some(table_selector.into()),
            button_position_selector: Some(button_position_selector.into()),
            ..Self::default()
        }
    }

    pub fn with_national_code_selector(mut self, selector: impl Into<String>) -> Self {
        self.national_code_selector = Some(selector.into());
        self
    }

    pub fn with_button_text(mut self, text: impl Into<String>) -> Self {
        self.button_text = text.into();
        self
    }
}
