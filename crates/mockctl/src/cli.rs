//! Clap derive structures for the `mockctl` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mockctl -- admin client for API-mocking servers
#[derive(Debug, Parser)]
#[command(
    name = "mockctl",
    version,
    about = "Manage mocked services and service actions from the command line",
    long_about = "Lists, creates, edits and deletes the services and service actions\n\
        registered on an API-mocking server through its admin REST API.",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "MOCKCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Mock server URL (overrides profile)
    #[arg(long, short = 's', env = "MOCKCTL_SERVER", global = true)]
    pub server: Option<String>,

    /// Group scope for service lists (overrides profile)
    #[arg(long, short = 'g', env = "MOCKCTL_GROUP", global = true)]
    pub group: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MOCKCTL_OUTPUT",
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
    #[arg(long, short = 'k', env = "MOCKCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MOCKCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// How yes/no flags are sent to the server (overrides profile)
    #[arg(long, global = true)]
    pub flag_encoding: Option<FlagEncodingArg>,
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
    /// Plain text, one id per line (scripting)
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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FlagEncodingArg {
    /// "yes" / "no" strings
    YesNo,
    /// JSON booleans
    Bool,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage mocked services
    #[command(alias = "svc")]
    Services(ServicesArgs),

    /// Manage service actions
    #[command(alias = "actions", alias = "sa")]
    ServiceActions(ServiceActionsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Paging, sorting and filtering for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Keep rows containing every whitespace-separated term
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Page to show (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page
    #[arg(long, short = 'n', default_value = "10")]
    pub count: usize,

    /// Sort field; prefix with '-' for descending (e.g. -timeoutms)
    #[arg(long, default_value = "name", allow_hyphen_values = true)]
    pub sort: String,

    /// Show every row on one page
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Field assignments shared by create and edit commands.
#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Set a field, e.g. --set timeoutms=5000 (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub sets: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Services
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServicesArgs {
    #[command(subcommand)]
    pub command: ServicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServicesCommand {
    /// List services in the current group
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one service
    Get {
        /// Service id
        id: i64,
    },

    /// Create a service
    New {
        /// Service name
        #[arg(long)]
        name: String,

        #[command(flatten)]
        fields: FieldArgs,

        /// Mock group id to bind
        #[arg(long)]
        mock_group: Option<i64>,

        /// Environment name
        #[arg(long)]
        environment: Option<String>,
    },

    /// Edit a service
    Edit {
        /// Service id
        id: i64,

        #[command(flatten)]
        fields: FieldArgs,

        /// Mock group id to bind
        #[arg(long)]
        mock_group: Option<i64>,

        /// Environment name
        #[arg(long)]
        environment: Option<String>,
    },

    /// Delete a service
    #[command(alias = "rm")]
    Delete {
        /// Service id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Service actions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServiceActionsArgs {
    #[command(subcommand)]
    pub command: ServiceActionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServiceActionsCommand {
    /// List service actions
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one service action
    Get {
        /// Service action id
        id: i64,
    },

    /// Edit a service action
    Edit {
        /// Service action id
        id: i64,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Rebuild the service action list from recorded traffic
    Regenerate,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config & completions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display the current configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
