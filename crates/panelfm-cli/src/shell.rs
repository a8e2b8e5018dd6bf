//! Interactive shell: one line in, one dispatched command out.

use anyhow::Result;
use panelfm_core::{Command, EntryKind, Session};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use crate::render;

const HELP: &str = "\
commands:
  ls                 re-list the current folder
  cd <name>|..|/path enter a folder, go up, or jump to a path
  open <name>        load a file into the editor
  show               print the open file
  set <text>         replace the open file's content
  append <text>      add a line to the open file
  save               write the open file back
  touch <name>       create an empty file
  mkdir <name>       create an empty folder
  rm <name>          delete an entry (folders with their contents)
  mv <old> <new>     rename an entry
  pwd                print the current folder
  help | quit
";

/// What one input line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Run(Command),
    /// Enter a child folder; checked against the listing first.
    Enter(String),
    /// Add a line to the open buffer.
    Append(String),
    /// Delete after confirmation.
    Remove(String),
    Show,
    Pwd,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parses one shell line. Arguments are split on the first space only, so
/// names may contain spaces except for `mv`, which splits on the last one.
pub fn parse_line(input: &str) -> Line {
    let input = input.trim();
    let (verb, rest) = match input.split_once(' ') {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (input, ""),
    };

    match verb {
        "" => Line::Empty,
        "ls" | "refresh" => Line::Run(Command::Refresh),
        "cd" if rest == ".." => Line::Run(Command::GoUp),
        "cd" if rest.starts_with('/') => Line::Run(Command::Navigate(rest.to_string())),
        "cd" if rest.is_empty() => Line::Run(Command::Navigate(".".to_string())),
        "cd" => Line::Enter(rest.to_string()),
        "up" => Line::Run(Command::GoUp),
        "open" => Line::Run(Command::Open(rest.to_string())),
        "show" | "cat" => Line::Show,
        "set" => Line::Run(Command::Edit(rest.to_string())),
        "append" => Line::Append(rest.to_string()),
        "save" => Line::Run(Command::Save),
        "touch" => Line::Run(Command::Create(rest.to_string(), EntryKind::File)),
        "mkdir" => Line::Run(Command::Create(rest.to_string(), EntryKind::Folder)),
        "rm" => Line::Remove(rest.to_string()),
        "mv" => match rest.rsplit_once(' ') {
            Some((old, new)) => Line::Run(Command::Rename(old.trim().to_string(), new.to_string())),
            None => Line::Run(Command::Rename(rest.to_string(), String::new())),
        },
        "pwd" => Line::Pwd,
        "help" | "?" => Line::Help,
        "quit" | "exit" | "q" => Line::Quit,
        other => Line::Unknown(other.to_string()),
    }
}

/// Returns `true` for an answer that confirms a prompt.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

struct Console {
    lines: Lines<BufReader<Stdin>>,
    out: tokio::io::Stdout,
}

impl Console {
    async fn print(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.print(prompt).await?;
        Ok(self.lines.next_line().await?)
    }
}

/// Runs the shell until `quit` or end of input.
pub async fn run(session: &Session, confirm_delete: bool) -> Result<()> {
    let mut console = Console {
        lines: BufReader::new(tokio::io::stdin()).lines(),
        out: tokio::io::stdout(),
    };

    let event = session.dispatch(Command::Refresh).await;
    console.print(&render::event(&event)).await?;

    loop {
        let prompt = format!("{}> ", session.navigation().current_path());
        let Some(input) = console.ask(&prompt).await? else {
            break;
        };

        let command = match parse_line(&input) {
            Line::Empty => continue,
            Line::Quit => break,
            Line::Help => {
                console.print(HELP).await?;
                continue;
            }
            Line::Pwd => {
                let text = format!("{}\n", session.navigation().current_path());
                console.print(&text).await?;
                continue;
            }
            Line::Show => {
                let text = match session.editor() {
                    Some(buffer) => render::buffer(&buffer),
                    None => "no file is open\n".to_string(),
                };
                console.print(&text).await?;
                continue;
            }
            Line::Unknown(verb) => {
                console
                    .print(&format!("unknown command: {verb} (try help)\n"))
                    .await?;
                continue;
            }
            Line::Enter(name) => {
                let is_file = session
                    .navigation()
                    .find(&name)
                    .is_some_and(|entry| !entry.is_directory());
                if is_file {
                    console
                        .print(&format!("{name} is a file, use open\n"))
                        .await?;
                    continue;
                }
                Command::Open(name)
            }
            Line::Append(text) => {
                let current = session
                    .editor()
                    .map(|b| b.content().to_string())
                    .unwrap_or_default();
                Command::Edit(format!("{current}{text}\n"))
            }
            Line::Remove(name) => {
                if confirm_delete && !name.is_empty() {
                    let prompt = format!("Are you sure you want to delete '{name}'? [y/N] ");
                    let answer = console.ask(&prompt).await?.unwrap_or_default();
                    if !is_yes(&answer) {
                        continue;
                    }
                }
                Command::Delete(name)
            }
            Line::Run(command) => command,
        };

        tracing::debug!(?command, "dispatching");
        let event = session.dispatch(command).await;
        console.print(&render::event(&event)).await?;
    }

    Ok(())
}
