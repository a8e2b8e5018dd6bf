//! Configuration management for PanelFM.
//!
//! Client settings ([`settings::Config`]) are stored as a TOML file and
//! loaded at startup, then overridden from the environment.

pub mod settings;
