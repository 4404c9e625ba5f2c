//! Clap derive structures for the `sgsync` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sgsync -- keep firewall allow-lists pointed at your current public IP
#[derive(Debug, Parser)]
#[command(
    name = "sgsync",
    version,
    about = "Synchronize firewall rule groups with your current public IP",
    long_about = "Keeps ingress allow-list rules in cloud firewall rule groups\n\
        matching your current public address. Rules are identified by a\n\
        description tag; everything else in the group is left untouched.",
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
    /// Firewall profile to use
    #[arg(long, short = 'p', env = "SGSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Control-plane endpoint URL (overrides profile)
    #[arg(long, short = 'e', env = "SGSYNC_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// API key
    #[arg(long, env = "SGSYNC_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Rule group id to reconcile (repeatable, overrides profile)
    #[arg(
        long = "group",
        short = 'g',
        env = "SGSYNC_GROUPS",
        value_delimiter = ',',
        global = true
    )]
    pub groups: Vec<String>,

    /// Description tag marking managed rules (overrides profile)
    #[arg(long, short = 't', env = "SGSYNC_TAG", global = true)]
    pub tag: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SGSYNC_OUTPUT",
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
    #[arg(long, short = 'k', env = "SGSYNC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default from profile or 30)
    #[arg(long, env = "SGSYNC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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
    /// Run one reconciliation cycle and exit
    #[command(alias = "s")]
    Sync,

    /// Reconcile continuously on an interval
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Resolve and print the current public IP
    Ip,

    /// Show the ingress rules in the configured groups
    #[command(alias = "ls")]
    Rules,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Time between cycles (e.g. "5m", "90s"; default from profile or 5m)
    #[arg(
        long,
        short = 'i',
        env = "SGSYNC_INTERVAL",
        value_parser = humantime::parse_duration
    )]
    pub interval: Option<Duration>,

    /// Stop after this many cycles (default: run forever)
    #[arg(long)]
    pub cycles: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config file with an example profile
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Set a profile configuration value
    Set {
        /// Config key (endpoint, tag, groups, api_key, api_key_env,
        /// ip_providers, ca_cert, insecure, timeout, interval_secs)
        key: String,

        /// Value to set
        value: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
