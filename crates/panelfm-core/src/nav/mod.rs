//! Navigation logic for PanelFM.
//!
//! [`navigator`] holds the pure path arithmetic used to turn clicks into
//! remote paths, [`state::NavigationState`] the current directory and its
//! listing.

pub mod navigator;
pub mod state;
