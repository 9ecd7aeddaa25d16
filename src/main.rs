use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;

use spyglass::config::Config;
use spyglass::nav::{HidePassed, NavContext};
use spyglass::render::PlainRenderer;
use spyglass::report::{Report, handle_runner_event, system_clock};
use spyglass::runner;

/// Live report of a running test suite, reduced from runner lifecycle events.
#[derive(Parser, Debug)]
#[command(name = "spyglass")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Runner command emitting NDJSON events (default: spyglass.toml, then stdin)
    #[arg(long, short)]
    command: Option<String>,

    /// Workspace root (defaults to the current directory)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Location string seeding replay links, e.g. "/report?grep=x#hide_passed"
    #[arg(long)]
    location: Option<String>,

    /// Hide passed tests in the output
    #[arg(long)]
    hide_passed: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();
    let workspace = args
        .workspace
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let config = Config::load(&workspace);

    let location = args
        .location
        .or(config.view.location)
        .unwrap_or_else(|| "/".into());
    let nav = NavContext::parse(&location);
    let hide_passed =
        args.hide_passed || config.view.hide_passed || HidePassed::from_nav(&nav).enabled();

    let source = runner::select(args.command.or(config.runner.command), workspace);
    tracing::debug!("reading events from {} source", source.name());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let stream = tokio::spawn({
        let source = Arc::clone(&source);
        async move { source.stream(tx).await }
    });

    let mut report = Report::new(nav, system_clock());
    let mut renderer = PlainRenderer::new(hide_passed);

    // Events are applied strictly in arrival order; each handler runs to
    // completion before the next event is taken off the channel.
    while let Some(event) = rx.recv().await {
        handle_runner_event(&mut report, event, &mut renderer);
    }

    if let Err(e) = stream.await? {
        tracing::error!("event source failed: {e:#}");
    }

    renderer.finish();

    Ok(if report.stats.failures() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
