//! Headless front-end: same pipeline, plain-text summary instead of a TUI

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbosity: u8) {
    // Map -q/-v to tracing levels; default INFO
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr) // logs to stderr
        .with_target(false)
        .with_level(true)
        .compact()
        .finish();

    // Ignore error if already set in tests or env
    let _ = set_global_default(subscriber);
}

use filecab::{EngineEvent, Granularity, Organizer, OrganizerEngine, RenderSnapshot, RunState};

fn main() {
    let opts = Opts::parse();
    init_tracing((1 + opts.verbose).saturating_sub(opts.quiet));
    smol::block_on(async move {
        if let Err(e) = run(opts).await {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    });
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    anyhow::ensure!(
        opts.dir.is_dir(),
        "{} is not a directory",
        opts.dir.display()
    );
    let granularity = Granularity::from_flags(opts.year, opts.month);

    let handles = OrganizerEngine::start(Organizer::new(&opts.dir, granularity));

    // Headless consumer: execute render jobs in submission order until the
    // producer drops the queue. Only the last view is kept for the summary.
    let mut view = RenderSnapshot::default();
    while let Ok(job) = handles.jobs.recv().await {
        view = job.into_snapshot();
        handles.sync.job_completed();
    }
    debug_assert_eq!(handles.sync.state(), RunState::Stopped);

    let mut fatal = None;
    while let Ok(evt) = handles.events.try_recv() {
        if let EngineEvent::Error(msg) = evt {
            fatal = Some(msg);
        }
    }

    print_summary(&view, &opts.dir);
    if let Some(msg) = fatal {
        anyhow::bail!(msg);
    }
    Ok(())
}

fn print_summary(view: &RenderSnapshot, root: &Path) {
    println!("Organized {}", root.display());
    println!("Total files: {}", view.total_files);
    println!("Moved: {}", view.processed_files);
    println!("Failed: {}", view.failed_moves);
    for row in &view.rows {
        let pad = if row.indent { "    " } else { "  " };
        println!("{pad}{}: {}", row.label, row.count);
    }
}

#[derive(Parser)]
#[command(version, about = "Organize files by timestamp (headless)")]
pub struct Opts {
    /// Directory containing files to organize
    #[arg(short, long)]
    pub dir: PathBuf,
    /// Organize files by year
    #[arg(short = 'y', long)]
    pub year: bool,
    /// Organize files by month within each year
    #[arg(short = 'm', long)]
    pub month: bool,
    /// Increase verbosity (-v, -vv). Default INFO.
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Decrease verbosity (-q)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}
