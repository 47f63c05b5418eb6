use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinHandle,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trigger_core::{
    load_settings, spawn_view, ButtonView, ClickOutcome, HttpScraperTransport, TriggerController,
    TriggerSettings,
};

mod terminal_view;

use terminal_view::TerminalView;

/// Terminal button for the scraper endpoint. Each Enter keypress is one click.
#[derive(Parser, Debug)]
#[command(name = "trigger")]
struct Args {
    /// Config file; defaults to ./trigger.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    reset_delay_ms: Option<u64>,
    /// Ignore clicks while a run request is still pending.
    #[arg(long)]
    single_flight: bool,
    /// Click this many times and exit instead of reading stdin.
    #[arg(long)]
    clicks: Option<u32>,
    /// Pause between scripted clicks.
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,
}

impl Args {
    fn apply(&self, settings: &mut TriggerSettings) {
        if let Some(server_url) = &self.server_url {
            settings.server_url = server_url.clone();
        }
        if let Some(reset_delay_ms) = self.reset_delay_ms {
            settings.reset_delay_ms = reset_delay_ms;
        }
        if self.single_flight {
            settings.allow_concurrent = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    args.apply(&mut settings);

    let transport = HttpScraperTransport::new(&settings).context("invalid scraper endpoint")?;
    info!(endpoint = %transport.endpoint(), "scraper trigger ready");
    let controller = TriggerController::new(Arc::new(transport), &settings);

    let view = Arc::new(TerminalView::stdout());
    let view_task = spawn_view(&controller, Arc::clone(&view));

    let clicks = match args.clicks {
        Some(count) => {
            let interval = Duration::from_millis(args.interval_ms);
            scripted_clicks(&controller, count, interval).await
        }
        None => interactive_clicks(&controller).await?,
    };

    let mut summary = ClickSummary::default();
    for click in clicks {
        match click.await {
            Ok(outcome) => summary.record(&outcome),
            Err(error) => warn!(%error, "click task failed"),
        }
    }
    controller.wait_until_idle().await;
    info!(
        started = summary.started,
        rejected = summary.rejected,
        failed = summary.failed,
        ignored = summary.ignored,
        "all clicks settled"
    );

    view_task.abort();
    view.render(&controller.appearance());
    Ok(())
}

async fn scripted_clicks(
    controller: &Arc<TriggerController>,
    count: u32,
    interval: Duration,
) -> Vec<JoinHandle<ClickOutcome>> {
    let mut clicks = Vec::with_capacity(count as usize);
    for n in 0..count {
        if n > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
        clicks.push(controller.spawn_click());
    }
    clicks
}

async fn interactive_clicks(
    controller: &Arc<TriggerController>,
) -> Result<Vec<JoinHandle<ClickOutcome>>> {
    eprintln!("Press Enter to run the scraper, or type q to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut clicks = Vec::new();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if matches!(line.trim(), "q" | "quit") {
            break;
        }
        clicks.push(controller.spawn_click());
    }
    Ok(clicks)
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ClickSummary {
    started: usize,
    rejected: usize,
    failed: usize,
    ignored: usize,
}

impl ClickSummary {
    fn record(&mut self, outcome: &ClickOutcome) {
        match outcome {
            ClickOutcome::Started { .. } => self.started += 1,
            ClickOutcome::Rejected { .. } => self.rejected += 1,
            ClickOutcome::TransportFailed { .. } => self.failed += 1,
            ClickOutcome::Ignored => self.ignored += 1,
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
