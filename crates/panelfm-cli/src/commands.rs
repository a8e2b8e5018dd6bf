//! One-shot subcommands. Each runs a single operation and exits.

use std::path::Path;

use anyhow::{anyhow, bail, Result};
use panelfm_core::{CoreError, EntryKind, Operation, Outcome, RemotePath, Session};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};

use crate::{render, shell};

/// Turns a core error into the message the user sees, keeping the cause in the log.
fn report(operation: Operation) -> impl FnOnce(CoreError) -> anyhow::Error {
    move |e| {
        tracing::debug!(op = operation.label(), error = %e, "operation failed");
        anyhow!(e.user_message(operation))
    }
}

fn parse(raw: &str, operation: Operation) -> Result<RemotePath> {
    RemotePath::parse(raw).map_err(report(operation))
}

async fn print(text: &str) -> Result<()> {
    let mut out = tokio::io::stdout();
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

pub async fn ls(session: &Session, path: Option<&str>) -> Result<()> {
    let path = match path {
        Some(raw) => parse(raw, Operation::List)?,
        None => RemotePath::root(),
    };
    session.list(&path).await.map_err(report(Operation::List))?;
    print(&render::listing(&session.navigation())).await
}

pub async fn cat(session: &Session, path: &str) -> Result<()> {
    let path = parse(path, Operation::Read)?;
    session.read(&path).await.map_err(report(Operation::Read))?;
    match session.editor() {
        Some(buffer) => print(buffer.content()).await,
        None => bail!(Operation::Read.failure_message()),
    }
}

/// Overwrites an existing file with the contents of `from`, or stdin.
pub async fn write(session: &Session, path: &str, from: Option<&Path>) -> Result<()> {
    let path = parse(path, Operation::Write)?;
    let content = match from {
        Some(file) => tokio::fs::read_to_string(file).await?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };
    session
        .write(&path, &content)
        .await
        .map_err(report(Operation::Write))?;
    tracing::info!(path = %path, bytes = content.len(), "saved");
    print(&format!("{}\n", panelfm_core::SAVE_SUCCESS_MESSAGE)).await
}

pub async fn touch(session: &Session, path: &str) -> Result<()> {
    create(session, path, EntryKind::File).await
}

pub async fn mkdir(session: &Session, path: &str) -> Result<()> {
    create(session, path, EntryKind::Folder).await
}

async fn create(session: &Session, path: &str, kind: EntryKind) -> Result<()> {
    let operation = Operation::Create(kind);
    let path = parse(path, operation)?;
    session.create(&path, kind).await.map_err(report(operation))?;
    tracing::info!(path = %path, %kind, "created");
    Ok(())
}

/// Deletes `path`, asking first when `confirm` is set.
pub async fn rm(session: &Session, path: &str, confirm: bool) -> Result<()> {
    let path = parse(path, Operation::Delete)?;
    if confirm {
        print(&format!("Are you sure you want to delete '{path}'? [y/N] ")).await?;
        let answer = BufReader::new(tokio::io::stdin())
            .lines()
            .next_line()
            .await?
            .unwrap_or_default();
        if !shell::is_yes(&answer) {
            return print("aborted\n").await;
        }
    }
    session.delete(&path).await.map_err(report(Operation::Delete))?;
    tracing::info!(path = %path, "deleted");
    Ok(())
}

pub async fn mv(session: &Session, path: &str, new_name: &str) -> Result<()> {
    let path = parse(path, Operation::Rename)?;
    match session
        .rename(&path, new_name)
        .await
        .map_err(report(Operation::Rename))?
    {
        Outcome::Done => tracing::info!(path = %path, new_name, "renamed"),
        Outcome::Skipped => print("nothing to rename\n").await?,
    }
    Ok(())
}
