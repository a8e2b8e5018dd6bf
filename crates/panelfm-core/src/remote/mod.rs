//! Access to the remote file-management agent.
//!
//! [`path::RemotePath`] and [`entry::DirectoryEntry`] make up the data
//! model shared with the agent, [`transport::FileTransport`] is the seam a
//! session sends requests through, and [`http::HttpTransport`] is the
//! production implementation of that seam.

pub mod entry;
pub mod http;
pub mod path;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;
