use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voice_rename::config::DEFAULT_EXTENSION;
use voice_rename::report::RunReport;
use voice_rename::{
    spawn_execution, Action, Batch, BatchPlanner, ConfigBuilder, ExecutionEvent, Executor, Mode,
    OperationStatus, Outcome, StopSignal, Summary,
};

#[derive(Parser, Debug)]
#[command(
    name = "voice-rename",
    version,
    about = "Rename voice clips and write their tags from filename conventions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rename `Character_Title` style files to `[Title]Character - 01 Title`
    Rename(RunArgs),
    /// Write title/artist/album/track tags from `[Album]Artist - 01 Title` names
    Tags(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Directory to process
    #[arg(long, env = "VOICE_RENAME_DIR")]
    directory: PathBuf,

    /// Also process subdirectories
    #[arg(long)]
    recursive: bool,

    /// Show what would happen without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Audio file extension to pick up
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Do not ask for confirmation
    #[arg(long, short)]
    yes: bool,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let (mode, args) = match cli.command {
        Command::Rename(args) => (Mode::Rename, args),
        Command::Tags(args) => (Mode::WriteTags, args),
    };

    init_tracing(args.verbose);
    run(mode, args).await
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(mode: Mode, args: RunArgs) -> Result<ExitCode> {
    let config = ConfigBuilder::new()
        .directory(&args.directory)
        .recursive(args.recursive)
        .mode(mode)
        .extension(&args.extension)
        .build()?;

    let planner = BatchPlanner::new(config);
    let batch = planner
        .plan()
        .with_context(|| format!("Cannot plan batch for {}", args.directory.display()))?;

    print_plan(&batch);

    if batch.planned_count() == 0 {
        println!("\nNo files to process.");
        if let Some(path) = &args.report {
            RunReport::new(&batch, args.dry_run, &Summary::default()).write_to(path)?;
        }
        return Ok(if batch.has_collisions() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    if !args.yes && !confirm(mode, args.dry_run)? {
        println!("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let stop = StopSignal::new();
    let ctrl_c_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nStopping after the current file...");
            ctrl_c_stop.request_stop();
        }
    });

    let (handle, mut events) = spawn_execution(Executor::with_lofty(), batch, args.dry_run, stop);

    while let Some(event) = events.recv().await {
        print_event(&event, &args.directory);
    }

    let (batch, summary) = handle.await.context("Execution worker failed")?;

    if let Some(path) = &args.report {
        RunReport::new(&batch, args.dry_run, &summary).write_to(path)?;
        println!("Report written to {}", path.display());
    }

    print_summary(&summary, args.dry_run);

    Ok(if summary.failed > 0 || batch.has_collisions() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_plan(batch: &Batch) {
    println!("Voice Rename Tool");
    println!("=================");
    println!(
        "{} planned, {} skipped in {}\n",
        batch.planned_count(),
        batch.skipped_count(),
        batch.root.display()
    );

    for op in &batch.operations {
        let source = relative(&op.source, &batch.root);
        match (&op.action, &op.status) {
            (_, OperationStatus::Skipped(reason)) => {
                println!("  - {}  (skipped: {})", source, reason);
            }
            (Some(Action::Rename { target }), _) => {
                println!("  {} -> {}", source, relative(target, &batch.root));
            }
            (Some(Action::WriteTags { tags }), _) => {
                println!(
                    "  {}\n      title: {} | artist: {} | album: {} | track: {}",
                    source,
                    tags.track_title(),
                    tags.performer(),
                    tags.album(),
                    tags.track_number()
                );
            }
            (None, _) => println!("  - {}", source),
        }
    }

    for collision in &batch.collisions {
        println!(
            "⚠ Collision: {} would be produced by {} file(s); none of them will be renamed",
            relative(&collision.target, &batch.root),
            collision.colliders.len() + 1
        );
    }
}

fn confirm(mode: Mode, dry_run: bool) -> Result<bool> {
    let action = match mode {
        Mode::Rename => "Rename files",
        Mode::WriteTags => "Write tags",
    };
    let note = if dry_run { " (dry-run, nothing will be written)" } else { "" };

    print!("\n{}{}? [y/N] ", action, note);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer).context("Failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn print_event(event: &ExecutionEvent, root: &Path) {
    let ExecutionEvent::Item(item) = event else {
        return;
    };
    let source = relative(&item.source, root);
    match &item.outcome {
        Outcome::Simulated { description } => println!("Dry-run: would {}", description),
        Outcome::Succeeded { .. } => println!("✓ {}", source),
        Outcome::Failed { reason } => println!("✗ {}: {}", source, reason),
        Outcome::Skipped { .. } => {}
        Outcome::NotRun => println!("- {} (not run)", source),
    }
}

fn print_summary(summary: &Summary, dry_run: bool) {
    println!("=================");
    if dry_run {
        println!(
            "Summary: {} simulated, {} skipped (dry-run, no files changed)",
            summary.simulated, summary.skipped
        );
        return;
    }

    println!(
        "Summary: {} succeeded, {} failed, {} skipped",
        summary.succeeded, summary.failed, summary.skipped
    );
    if summary.not_run > 0 {
        println!("Stopped early: {} file(s) not processed", summary.not_run);
    }

    if summary.failed == 0 && summary.succeeded > 0 {
        println!("✓ All files processed successfully!");
    } else if summary.succeeded > 0 {
        println!("⚠ Some files were processed, but there were errors with others.");
    } else {
        println!("✗ No files were processed.");
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
