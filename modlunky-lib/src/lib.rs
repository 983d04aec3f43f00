//! State management for the Modlunky mod panel.
//!
//! The [`ModListStore`] owns the canonical list of mods together with the
//! panel's preferences, and exposes read-only views derived from them. All
//! state is built on the small signal graph in [`reactive`].

pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod reactive;
pub mod store;

pub use error::{Error, Result};
pub use store::ModListStore;
