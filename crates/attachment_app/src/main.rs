mod cli;
mod config;
mod logging;
mod page;
mod progress;
mod report;

use std::process;
use std::sync::Arc;

use attachment_engine::{
    AttachmentDownloader, ChannelProgressSink, DirectorySink, FetchSettings, Fetcher,
    HtmlRegionProvider, OutputDir, ReqwestFetcher, TriggerControl,
};
use clap::Parser;
use engine_logging::{engine_error, engine_info, engine_warn};
use futures_util::future::join_all;
use tokio::sync::mpsc;

use crate::cli::Cli;
use crate::config::load_config;
use crate::page::{load_page, PageSource};
use crate::progress::relay_events;
use crate::report::{build_report, write_report};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::initialize(cli.log.into(), cli.verbose);

    let exit_code = match run(&cli).await {
        Ok(()) => 0,
        Err(err) => {
            engine_error!("{:#}", err);
            1
        }
    };
    process::exit(exit_code);
}

/// Load config and page, wire the triggers and run the selected jobs.
///
/// Only setup failures are returned; job failures end up in the log and
/// the report.
async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), &cli.overrides())?;
    let source = PageSource::parse(&cli.page);
    let page = load_page(&source, &ReqwestFetcher::new(FetchSettings::default())).await?;
    OutputDir::new(&cli.output).ensure()?;

    let settings = FetchSettings {
        base_url: cli.base_url.clone().or_else(|| source.base_url()),
        ..FetchSettings::default()
    };
    let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(settings));
    let sink = Arc::new(DirectorySink::new(cli.output.clone(), fetcher.clone()));
    let provider = Arc::new(HtmlRegionProvider::new(page.html));
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let downloader = AttachmentDownloader::new(config, provider, fetcher, sink)
        .with_events(Arc::new(ChannelProgressSink::new(events_tx)));

    let controls = downloader.initialize().await?;
    for index in &cli.regions {
        if !controls.iter().any(|control| control.region().index == *index) {
            engine_warn!(region = *index; "No trigger was wired for this region");
        }
    }
    let activated: Vec<usize> = controls
        .iter()
        .map(|control| control.region().index)
        .filter(|&index| cli.selects(index))
        .collect();
    engine_info!(
        "Activating {} of {} trigger(s)",
        activated.len(),
        controls.len()
    );

    // The relay ends when the last event sender, held by the downloader and
    // its controls, is dropped at the end of `jobs`.
    let selection = activated.clone();
    let jobs = async move {
        let selected: Vec<&TriggerControl> = controls
            .iter()
            .filter(|control| selection.contains(&control.region().index))
            .collect();
        join_all(
            selected
                .iter()
                .map(|control| downloader.handle_trigger(control.region(), control)),
        )
        .await;
        drop(selected);
        drop(controls);
        drop(downloader);
    };
    let ((), events) = tokio::join!(jobs, relay_events(events_rx));

    if let Some(path) = &cli.report {
        let report = build_report(&cli.page, &cli.output, &activated, events);
        match write_report(path, &report) {
            Ok(()) => engine_info!("Wrote report to {:?}", path),
            Err(err) => engine_error!("{:#}", err),
        }
    }
    Ok(())
}
