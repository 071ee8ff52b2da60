//! vizreg - CLI orchestrator for visual-regression testing.
//!
//! Renders component snapshots, uploads them to the comparison service,
//! and maps outcomes onto CI-friendly exit codes.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};

use clap::{CommandFactory, Parser};
use console::style;
use tracing::debug;

use vizreg::cli::{Cli, Commands, CompletionsArgs, CompareArgs, EmptyArgs, HasReportArgs, RunArgs};
use vizreg::config::load_config;
use vizreg::dev::run_dev_loop;
use vizreg::error::{Result, VizError};
use vizreg::lifecycle;
use vizreg::logging;
use vizreg::progress::Reporter;
use vizreg::render::{CommandRenderer, Renderer};
use vizreg::report::{CurlReportClient, ReportMeta};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output_error(&e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    match &cli.command {
        None => print_usage(),
        Some(Commands::Run(args)) => cmd_run(cli, args),
        Some(Commands::Dev) => cmd_dev(cli),
        Some(Commands::HasReport(args)) => cmd_has_report(cli, args),
        Some(Commands::Empty(args)) => cmd_empty(cli, args),
        Some(Commands::Compare(args)) => cmd_compare(cli, args),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

/// No subcommand: show usage and succeed.
fn print_usage() -> Result<i32> {
    let mut command = Cli::command();
    command.print_help()?;
    Ok(0)
}

// === Commands ===

fn cmd_run(cli: &Cli, args: &RunArgs) -> Result<i32> {
    let config = load_config(&cli.config)?;
    let opts = cli.run_options();
    let reporter = Reporter::new(cli.quiet);

    let resolved = lifecycle::resolve_sha(args.sha.as_deref(), opts.only.as_deref());
    if resolved.generated {
        // Announced before any render/upload so the token survives failures.
        reporter.info(&format!(
            "No [sha] provided. A temporary one will be used in place: \"{}\".",
            resolved.sha
        ));
    }

    let renderer = CommandRenderer::new(&config);
    let client = CurlReportClient::new(&config);
    let meta = ReportMeta::from_options(&opts, config.project.as_deref());

    let task = reporter.task(format!("Preparing report ({})...", resolved.sha));
    let uploaded = match lifecycle::run_once(
        &renderer,
        &client,
        &resolved.sha,
        opts.only.as_deref(),
        &meta,
    ) {
        Ok(uploaded) => {
            task.success();
            uploaded
        }
        Err(e) => {
            task.fail();
            return Err(e);
        }
    };
    reporter.info(&format!("View results at {}", uploaded.url));
    Ok(0)
}

fn cmd_dev(cli: &Cli) -> Result<i32> {
    let config = load_config(&cli.config)?;
    let opts = cli.run_options();
    let reporter = Reporter::new(cli.quiet);

    let renderer = CommandRenderer::new(&config);
    let client = CurlReportClient::new(&config);
    let meta = ReportMeta::from_options(&opts, config.project.as_deref());

    reporter.info("Dev mode: watching for render passes (Ctrl+C to stop)...");
    let events = renderer.watch(opts.only.as_deref())?;
    run_dev_loop(&events, &client, &meta, &reporter);

    // The event channel only closes when the watcher process exits,
    // which dev mode treats as a failure worth a non-zero exit.
    Err(VizError::Render("render watcher exited".to_string()))
}

fn cmd_has_report(cli: &Cli, args: &HasReportArgs) -> Result<i32> {
    let config = load_config(&cli.config)?;
    let client = CurlReportClient::new(&config);

    let exists = lifecycle::has_report(&client, &args.sha)?;
    debug!(sha = %args.sha, exists, "report lookup");
    Ok(lifecycle::existence_exit_code(exists))
}

fn cmd_empty(cli: &Cli, args: &EmptyArgs) -> Result<i32> {
    let config = load_config(&cli.config)?;
    let opts = cli.run_options();
    let client = CurlReportClient::new(&config);
    let meta = ReportMeta::from_options(&opts, config.project.as_deref());

    let uploaded = lifecycle::upload_empty(&client, &args.sha, &meta)?;
    debug!(sha = %args.sha, url = %uploaded.url, "empty report uploaded");
    Ok(0)
}

fn cmd_compare(cli: &Cli, args: &CompareArgs) -> Result<i32> {
    let config = load_config(&cli.config)?;
    let opts = cli.run_options();
    let reporter = Reporter::new(cli.quiet);

    let client = CurlReportClient::new(&config);
    let meta = ReportMeta::from_options(&opts, config.project.as_deref());

    let result = lifecycle::compare_reports(&client, &args.sha1, &args.sha2, &meta)?;
    reporter.info(&result.summary);
    Ok(lifecycle::comparison_exit_code(&result))
}

fn cmd_completions(args: &CompletionsArgs) -> Result<i32> {
    clap_complete::generate(args.shell, &mut Cli::command(), "vizreg", &mut io::stdout());
    Ok(0)
}

// === Utility Functions ===

fn output_error(error: &VizError) {
    eprintln!("{}: {error}", style("Error").red().bold());
    if let Some(suggestion) = error.suggestion() {
        eprintln!("{}: {suggestion}", style("Hint").yellow());
    } else if !error.is_user_recoverable() {
        eprintln!("{}: rerun with -v for more detail", style("Hint").yellow());
    }
}
