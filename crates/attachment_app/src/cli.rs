use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

use crate::config::ConfigOverrides;
use crate::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "attachment-downloader")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Download the attachments listed in the tables of a portal page")]
#[command(after_help = "EXAMPLES:\n  \
    attachment-downloader --page case.html --table-selector table.files --button-position-selector caption\n  \
    attachment-downloader --page https://portal.example.com/cases/12 --config downloader.ron --region 0 --region 2")]
pub struct Cli {
    /// Page to scan: a local HTML file or an http(s) URL
    #[arg(long)]
    pub page: String,

    /// RON file with the downloader options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory downloads are saved into
    #[arg(short, long, default_value = "downloads")]
    pub output: PathBuf,

    #[arg(long, help = "Selector of each region (table) root")]
    pub table_selector: Option<String>,

    #[arg(long, help = "Selector, inside a region, where the trigger goes")]
    pub button_position_selector: Option<String>,

    #[arg(long, help = "Selector of the per-region national code used to name archives")]
    pub national_code_selector: Option<String>,

    #[arg(long, help = "Label of the trigger controls")]
    pub button_text: Option<String>,

    /// Base for relative attachment links (defaults to the page URL)
    #[arg(long)]
    pub base_url: Option<Url>,

    /// Region index to activate; repeat for several (default: all)
    #[arg(long = "region")]
    pub regions: Vec<usize>,

    /// Write a JSON report of every activated region to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            table_selector: self.table_selector.clone(),
            national_code_selector: self.national_code_selector.clone(),
            button_text: self.button_text.clone(),
            button_position_selector: self.button_position_selector.clone(),
        }
    }

    /// Whether the region with `index` should be activated.
    pub fn selects(&self, index: usize) -> bool {
        self.regions.is_empty() || self.regions.contains(&index)
    }
}
