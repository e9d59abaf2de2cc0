//! Library crate for user-manager-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - User record types (`model`)
//! - Remote REST client for user records (`remote`)
//! - In-memory collection mirrored against the remote service (`store`)
//! - Application state and update loop (`app`)
//! - UI rendering and widgets (`ui`)
//! - Command-line configuration (`config`) and start-up errors (`error`)
//!
//! It is used by the `user-manager-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod remote;
pub mod store;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use error::StartupError;
pub use model::{User, UserDraft, UserPatch, default_username};
pub use store::UserStore;
