//! Clap derive structures for the `wavecheck` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wavecheck -- WiFi/switch network diagnostics from the command line
#[derive(Debug, Parser)]
#[command(
    name = "wavecheck",
    version,
    about = "Diagnose WiFi and switch network health",
    long_about = "Connects to a network controller, takes a point-in-time snapshot of\n\
        devices, clients, and events, and produces a weighted health score,\n\
        a severity-classified issue list, and mesh-safe configuration\n\
        recommendations with cross-run deduplication.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "WAVECHECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "WAVECHECK_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Site name
    #[arg(long, short = 's', env = "WAVECHECK_SITE", global = true)]
    pub site: Option<String>,

    /// Controller username (overrides profile)
    #[arg(long, short = 'u', env = "WAVECHECK_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WAVECHECK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "WAVECHECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "WAVECHECK_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full diagnostic pass and print the report
    #[command(alias = "diag", alias = "d")]
    Diagnose(DiagnoseArgs),

    /// Print the composite health score and grade only
    Score(DiagnoseArgs),

    /// Inspect or maintain the recommendation history store
    #[command(alias = "hist")]
    History(HistoryArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Diagnose / Score ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DiagnoseArgs {
    /// Event look-back window in hours
    #[arg(long, default_value = "168")]
    pub within_hours: u32,

    /// Maximum events to fetch
    #[arg(long, default_value = "3000")]
    pub event_limit: u32,

    /// Path to the device-pattern table (TOML). Missing file is fine:
    /// classification degrades to "unknown".
    #[arg(long)]
    pub patterns: Option<PathBuf>,

    /// Path to the recommendation history store (JSON)
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Skip history suppression and persistence for this run
    #[arg(long)]
    pub no_history: bool,
}

// ── History ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,

    /// Path to the recommendation history store (JSON)
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List recorded recommendations
    #[command(alias = "ls")]
    List,

    /// Remove entries older than the retention window
    Prune {
        /// Retention window in days
        #[arg(long, default_value = "90")]
        days: i64,
    },

    /// Remove all entries
    Clear,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config file with a commented template profile
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print the active configuration (passwords redacted)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
