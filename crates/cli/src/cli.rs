//! CLI argument parsing for the `wharf` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use model::{BuildStatus, VersionFlags};

/// Command-line client for the Wharf API.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the Wharf API.
    #[arg(long, env = "WHARF_API_URL", default_value = "http://localhost:5001")]
    pub api_url: String,

    /// Raw `Authorization` header value, e.g. "Bearer abc123".
    #[arg(long, env = "WHARF_AUTH_HEADER", hide_env_values = true)]
    pub auth_header: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "WHARF_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Fail when the server is too new for this client.
    #[arg(long, env = "WHARF_ERR_IF_OUTDATED_CLIENT")]
    pub err_if_outdated_client: bool,

    /// Fail when the server is too old for the called endpoint.
    #[arg(long, env = "WHARF_ERR_IF_OUTDATED_SERVER")]
    pub err_if_outdated_server: bool,

    /// Do not log outdated client or server warnings.
    #[arg(long, env = "WHARF_DISABLE_OUTDATED_LOGGING")]
    pub disable_outdated_logging: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Args {
    pub fn version_flags(&self) -> VersionFlags {
        VersionFlags {
            err_if_outdated_client: self.err_if_outdated_client,
            err_if_outdated_server: self.err_if_outdated_server,
            disable_outdated_logging: self.disable_outdated_logging,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the server's version.
    Version,

    /// Check the server's health.
    Health,

    /// Ping the server.
    Ping,

    /// List configured execution engines.
    Engines,

    /// Inspect and update builds.
    #[command(subcommand)]
    Build(BuildCommand),

    /// Inspect projects.
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage build artifacts.
    #[command(subcommand)]
    Artifact(ArtifactCommand),
}

#[derive(Debug, Subcommand)]
pub enum BuildCommand {
    /// Get a build by ID.
    Get { id: u64 },

    /// List builds.
    List(BuildListArgs),

    /// Print the log lines of a build.
    Logs { id: u64 },

    /// Set the status of a build.
    SetStatus {
        id: u64,
        /// Scheduling, Running, Completed or Failed.
        status: BuildStatus,
    },
}

#[derive(Debug, clap::Args)]
pub struct BuildListArgs {
    #[arg(long)]
    pub project_id: Option<u64>,

    #[arg(long)]
    pub limit: Option<u32>,

    /// Requires --limit.
    #[arg(long, requires = "limit")]
    pub offset: Option<u32>,

    #[arg(long)]
    pub status: Option<BuildStatus>,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Get a project by ID.
    Get { id: u64 },

    /// List projects.
    List(ProjectListArgs),
}

#[derive(Debug, clap::Args)]
pub struct ProjectListArgs {
    /// Exact project name.
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub limit: Option<u32>,

    /// Requires --limit.
    #[arg(long, requires = "limit")]
    pub offset: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum ArtifactCommand {
    /// Upload a file as an artifact of a build.
    Upload { build_id: u64, file: PathBuf },
}
