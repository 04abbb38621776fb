use std::fs;
use std::path::Path;

use anyhow::Context;
use attachment_core::DownloaderConfig;
use engine_logging::engine_info;

/// Options given on the command line; they win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub table_selector: Option<String>,
    pub national_code_selector: Option<String>,
    pub button_text: Option<String>,
    pub button_position_selector: Option<String>,
}

/// Read the RON config file when one is given, then apply `overrides`.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<DownloaderConfig> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {:?}", path))?;
            let config: DownloaderConfig = ron::from_str(&content)
                .with_context(|| format!("failed to parse config file {:?}", path))?;
            engine_info!("Loaded downloader config from {:?}", path);
            config
        }
        None => DownloaderConfig::default(),
    };
    apply_overrides(&mut config, overrides);
    Ok(config)
}

fn apply_overrides(config: &mut DownloaderConfig, overrides: &ConfigOverrides) {
    if let Some(selector) = &overrides.table_selector {
        config.table_selector = Some(selector.clone());
    }
    if let Some(selector) = &overrides.national_code_selector {
        config.national_code_selector = Some(selector.clone());
    }
    if let Some(text) = &overrides.button_text {
        config.button_text = text.clone();
    }
    if let Some(selector) = &overrides.button_position_selector {
        config.button_position_selector = Some(selector.clone());
    }
}
