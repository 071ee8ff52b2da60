//! CLI argument definitions and command dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default config file location, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".vizreg.toml";

/// vizreg - Visual-regression test orchestrator.
///
/// Renders component snapshots locally, uploads them to a comparison
/// service keyed by a report SHA, and maps comparison outcomes onto
/// CI-friendly exit codes.
#[derive(Parser, Debug)]
#[command(name = "vizreg", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(
        long,
        short = 'c',
        global = true,
        default_value = DEFAULT_CONFIG_FILE,
        env = "VIZREG_CONFIG"
    )]
    pub config: PathBuf,

    /// Limit rendering to one component
    #[arg(long, short = 'o', global = true)]
    pub only: Option<String>,

    /// Provide a link back to the commit
    #[arg(long, short = 'l', global = true)]
    pub link: Option<String>,

    /// Associate the run with a message (e.g. commit subject)
    #[arg(long, short = 'm', global = true)]
    pub message: Option<String>,

    /// The author of the commit (email)
    #[arg(long, short = 'a', global = true)]
    pub author: Option<String>,

    /// Verbose output (repeat for more detail: -v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Collects the shared per-run options into one immutable bundle.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            only: self.only.clone(),
            link: self.link.clone(),
            message: self.message.clone(),
            author: self.author.clone(),
        }
    }
}

/// Shared per-invocation options, immutable once parsed.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub only: Option<String>,
    pub link: Option<String>,
    pub message: Option<String>,
    pub author: Option<String>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a full run: render snapshots and upload a report
    Run(RunArgs),

    /// Start dev mode: re-render on change, compare against the session baseline
    Dev,

    /// Check if there is a report for a specific sha
    #[command(name = "has-report")]
    HasReport(HasReportArgs),

    /// Mark a report as empty (no visual surface for this sha)
    Empty(EmptyArgs),

    /// Compare reports for two different shas
    Compare(CompareArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Report identifier (a temporary one is generated when omitted)
    pub sha: Option<String>,
}

#[derive(Parser, Debug)]
pub struct HasReportArgs {
    /// Report identifier to look up
    pub sha: String,
}

#[derive(Parser, Debug)]
pub struct EmptyArgs {
    /// Report identifier to mark as empty
    pub sha: String,
}

#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Baseline report identifier
    pub sha1: String,

    /// Candidate report identifier
    pub sha2: String,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
