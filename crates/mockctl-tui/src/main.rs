//! `mockctl-tui`: terminal admin screens for a mock server.
//!
//! Two tabs mirror the admin UI: the services list (scoped by the group
//! selector) and the service actions list. Enter on a row opens its
//! form; `n` opens a new service form.
//!
//! Logs go to a file so they never corrupt the terminal. A background
//! bridge task feeds navigator and event-bus traffic into the action loop.

mod action;
mod app;
mod bridge;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

#[cfg(test)]
mod testing;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::Section;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mockctl_config::{Profile, load_config_or_default, log_dir, profile_to_client_config};
use mockctl_core::{Admin, ClientConfig, TlsVerification};

use crate::app::App;

/// Browse and edit mock services and service actions.
#[derive(Parser, Debug)]
#[command(name = "mockctl-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short, long, env = "MOCKCTL_PROFILE")]
    profile: Option<String>,

    /// Server URL, bypassing the config file (e.g. http://localhost:9010)
    #[arg(short, long, env = "MOCKCTL_SERVER")]
    server: Option<String>,

    /// Initial group for the services list
    #[arg(short, long)]
    group: Option<String>,

    /// Accept self-signed certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log file path (defaults to the mockctl data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. The guard must live until exit so logs flush.
fn setup_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("mockctl_tui={level},mockctl_core={level}"))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| log_dir().join("mockctl-tui.log"));
    let dir = log_file.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("cannot create log directory {}", dir.display()))?;
    let name = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("mockctl-tui.log"));

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .init();

    Ok(guard)
}

/// Resolve connection settings: `--server` wins over the config file.
fn build_client_config(cli: &Cli) -> Result<ClientConfig> {
    let cfg = load_config_or_default();
    let profile = match &cli.server {
        Some(server) => Profile::new(server.clone()),
        None => cfg
            .profile(cli.profile.as_deref())
            .map(|(_, profile)| profile.clone())
            .suggestion("run `mockctl config init` or pass --server")?,
    };

    let mut config = profile_to_client_config(&profile, &cfg.defaults)?;
    if let Some(group) = &cli.group {
        config.group = Some(group.clone()).filter(|g| !g.is_empty());
    }
    if cli.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli)?;

    let config = build_client_config(&cli)?;
    info!(url = %config.url, group = ?config.group, "starting mockctl-tui");

    let admin = Admin::connect(&config).wrap_err("cannot set up the admin client")?;
    App::new(admin).run().await
}
