//! Plain-text rendering of core state and events.

use panelfm_core::{EditorBuffer, Event, NavigationState};

/// Renders a directory listing; directories get a trailing slash.
pub fn listing(state: &NavigationState) -> String {
    let mut out = format!("Current Path: {}\n", state.current_path());
    if state.can_ascend() {
        out.push_str("  ../\n");
    }
    for entry in state.entries() {
        if entry.is_directory() {
            out.push_str(&format!("  {}/\n", entry.name()));
        } else {
            out.push_str(&format!("  {}\n", entry.name()));
        }
    }
    if state.entries().is_empty() {
        out.push_str("  (empty)\n");
    }
    out
}

/// Renders the open file with a header line.
pub fn buffer(buffer: &EditorBuffer) -> String {
    let marker = if buffer.is_dirty() { " [modified]" } else { "" };
    format!("Edit: {}{marker}\n{}\n", buffer.path(), buffer.content())
}

/// Renders the outcome of one dispatched command.
pub fn event(event: &Event) -> String {
    match event {
        Event::DirectoryLoaded(state) => listing(state),
        Event::FileLoaded(b) => buffer(b),
        Event::BufferEdited(b) => format!(
            "{} updated ({} bytes, unsaved)\n",
            b.path(),
            b.content().len()
        ),
        Event::FileSaved { message, .. } => format!("{message}\n"),
        Event::OperationComplete { operation, state } => {
            format!("{} done\n{}", operation.label(), listing(state))
        }
        Event::Skipped { operation } => format!("{} skipped\n", operation.label()),
        Event::Superseded { operation } => {
            format!("{} result dropped, a newer one arrived first\n", operation.label())
        }
        Event::OperationFailed { error, .. } => format!("error: {error}\n"),
    }
}
