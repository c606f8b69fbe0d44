//! Clap derive structures for the `nxtop` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nxtop -- find the busiest interfaces on a fleet of NX-OS switches
#[derive(Debug, Parser)]
#[command(
    name = "nxtop",
    version,
    about = "Rank NX-OS switch interfaces by inbound and outbound traffic",
    long_about = "Polls every switch in the inventory over NX-API at once,\n\
        ranks its interfaces by received and transmitted bytes, and writes\n\
        a per-device brief plus an optional console table.",
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
    /// Inventory file (YAML or TOML)
    #[arg(long, short = 'i', env = "NXTOP_INVENTORY", global = true)]
    pub inventory: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NXTOP_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides the inventory)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Per-device tables (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the fleet and report the busiest interfaces
    #[command(alias = "p")]
    Poll(PollArgs),

    /// Inspect the inventory and manage stored credentials
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct PollArgs {
    /// Poll only these devices (repeatable)
    #[arg(long = "device", short = 'd', value_name = "DEVICE")]
    pub devices: Vec<String>,

    /// Directory for the per-device report files
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Keep only the busiest N interfaces per direction
    #[arg(long, short = 't', value_name = "N")]
    pub top: Option<usize>,

    /// Maximum number of devices polled at once
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Do not print the console tables
    #[arg(long)]
    pub no_print: bool,

    /// Do not write report files
    #[arg(long)]
    pub no_files: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved inventory (passwords masked)
    Show,

    /// Print the inventory file path
    Path,

    /// Store the fleet password in the system keyring
    SetPassword {
        /// Username to store the password for (defaults to the inventory's)
        #[arg(long, short = 'u')]
        username: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
