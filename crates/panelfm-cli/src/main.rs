mod cli;
mod commands;
mod render;
mod shell;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use panelfm_core::{Config, CoreError, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, CliCommand};

const ENV_CONFIG: &str = "PANELFM_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panelfm_cli=info,panelfm_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?
        .with_env_overrides()
        .context("invalid environment override")?;
    tracing::debug!(base_url = %config.remote.base_url, "configuration loaded");

    let session = Session::connect(&config.remote).context("cannot set up the agent client")?;
    let confirm_delete = config.general.confirm_delete;

    match cli.command.unwrap_or(CliCommand::Shell) {
        CliCommand::Ls { path } => commands::ls(&session, path.as_deref()).await,
        CliCommand::Cat { path } => commands::cat(&session, &path).await,
        CliCommand::Write { path, from } => commands::write(&session, &path, from.as_deref()).await,
        CliCommand::Touch { path } => commands::touch(&session, &path).await,
        CliCommand::Mkdir { path } => commands::mkdir(&session, &path).await,
        CliCommand::Rm { path, yes } => {
            commands::rm(&session, &path, confirm_delete && !yes).await
        }
        CliCommand::Mv { path, new_name } => commands::mv(&session, &path, &new_name).await,
        CliCommand::Shell => shell::run(&session, confirm_delete).await,
    }
}

/// Resolves and loads the config file.
///
/// An explicit `--config` or `$PANELFM_CONFIG` must exist; the default
/// locations fall back to built-in defaults when absent.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let explicit = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(ENV_CONFIG).map(PathBuf::from));
    if let Some(path) = explicit {
        return Config::load(&path)
            .with_context(|| format!("cannot load config {}", path.display()));
    }

    let path = default_config_path();
    match Config::load(&path) {
        Ok(config) => Ok(config),
        Err(CoreError::NotFound(_)) => Ok(Config::default()),
        Err(e) => Err(e).with_context(|| format!("cannot load config {}", path.display())),
    }
}

fn default_config_path() -> PathBuf {
    let local = PathBuf::from("config").join("panelfm.toml");
    if local.exists() {
        return local;
    }
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
        .join(".config")
        .join("panelfm")
        .join("config.toml")
}
