//! File editing flow.

pub mod buffer;
