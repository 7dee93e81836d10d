//! `wharf` CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** from flags and `WHARF_*` environment variables.
//! 2. **Wire observability** by installing a `tracing-subscriber` on stderr,
//!    as text or JSON, filtered by `RUST_LOG`.
//! 3. **Construct the client** and run one command, printing its result as
//!    pretty JSON on stdout.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use client::{Client, UploadFile};
use model::request::BuildStatusUpdate;
use model::{BuildId, BuildSearch, ProjectId, ProjectSearch};
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{ArtifactCommand, Args, BuildCommand, Command, LogFormat, ProjectCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args)?;

    debug!(command = ?args.command, api_url = %args.api_url, "Starting.");

    let mut client = build_client(&args)?;
    run(&mut client, args.command).await
}

/// Installs the global tracing subscriber.
fn init_tracing(args: &Args) -> Result<()> {
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match args.log_format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| anyhow::anyhow!(err)).context("Failed to install tracing subscriber")
}

fn build_client(args: &Args) -> Result<Client> {
    let mut client = Client::new(args.api_url.clone())
        .context("Invalid API URL")?
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .context("Failed to build HTTP client")?
        .with_version_flags(args.version_flags());
    if let Some(header) = &args.auth_header {
        client = client.with_auth_header(header.clone());
    }
    Ok(client)
}

async fn run(client: &mut Client, command: Command) -> Result<()> {
    match command {
        Command::Version => print_json(&client.get_version().await?),
        Command::Health => print_json(&client.get_health().await?),
        Command::Ping => print_json(&client.ping().await?),
        Command::Engines => print_json(&client.get_engine_list().await?),
        Command::Build(command) => run_build(client, command).await,
        Command::Project(command) => run_project(client, command).await,
        Command::Artifact(command) => run_artifact(client, command).await,
    }
}

async fn run_build(client: &mut Client, command: BuildCommand) -> Result<()> {
    match command {
        BuildCommand::Get { id } => print_json(&client.get_build(BuildId::new(id)).await?),
        BuildCommand::List(list) => {
            let search = BuildSearch {
                project_id: list.project_id.map(ProjectId::new),
                limit: list.limit,
                offset: list.offset,
                status: list.status,
                ..BuildSearch::default()
            };
            print_json(&client.get_build_list(&search).await?)
        }
        BuildCommand::Logs { id } => {
            let logs = client
                .get_build_log_list(BuildId::new(id))
                .await
                .with_context(|| format!("Failed to get logs of build {id}"))?;
            print_json(&logs)
        }
        BuildCommand::SetStatus { id, status } => {
            let build = client
                .update_build_status(BuildId::new(id), BuildStatusUpdate { status })
                .await
                .with_context(|| format!("Failed to set status of build {id}"))?;
            print_json(&build)
        }
    }
}

async fn run_project(client: &mut Client, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::Get { id } => print_json(&client.get_project(ProjectId::new(id)).await?),
        ProjectCommand::List(list) => {
            let search = ProjectSearch {
                name: list.name,
                limit: list.limit,
                offset: list.offset,
                ..ProjectSearch::default()
            };
            print_json(&client.get_project_list(&search).await?)
        }
    }
}

async fn run_artifact(client: &mut Client, command: ArtifactCommand) -> Result<()> {
    match command {
        ArtifactCommand::Upload { build_id, file } => {
            let upload = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let artifacts = client
                .create_build_artifact(BuildId::new(build_id), vec![upload])
                .await
                .with_context(|| format!("Failed to upload {}", file.display()))?;
            print_json(&artifacts)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{text}");
    Ok(())
}
