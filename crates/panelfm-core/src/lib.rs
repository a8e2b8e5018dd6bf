//! PanelFM core library: UI-agnostic remote file management.
//!
//! `panelfm-core` lets a frontend browse and edit files that live behind a
//! control panel's file-management agent. It is decoupled from any UI so
//! the terminal client and other frontends share the same logic.
//!
//! # Modules
//!
//! - [`remote`]: Data model shared with the agent ([`RemotePath`], [`DirectoryEntry`]) and the transport seam.
//! - [`nav`]: Path arithmetic ([`descend`], [`ascend`]) and [`NavigationState`].
//! - [`editor`]: The [`EditorBuffer`] for the file being edited.
//! - [`session`]: [`Session`], the client issuing remote operations and keeping state consistent.
//! - [`config`]: TOML-based settings with environment overrides.
//! - [`event`]: Command and event types for UI ↔ Core communication.
//! - [`error`]: Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod nav;
pub mod remote;
pub mod session;

pub use config::settings::{Config, GeneralConfig, RemoteConfig};
pub use editor::buffer::EditorBuffer;
pub use error::{CoreError, CoreResult, FailureKind};
pub use event::{Command, Event, Operation, SAVE_SUCCESS_MESSAGE};
pub use nav::navigator::{ascend, descend, resolve_action_target, validate_name};
pub use nav::state::NavigationState;
pub use remote::entry::{DirectoryEntry, EntryKind};
pub use remote::http::HttpTransport;
pub use remote::path::{RemotePath, ROOT_SENTINEL};
pub use remote::transport::{FileTransport, ListResponse};
pub use session::slot::Landed;
pub use session::{Outcome, Session};
