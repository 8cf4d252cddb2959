//! Weekhours - command-line editor for a weekly opening-hours schedule.
//!
//! This crate wires the pattern operations of `weekhours-core` to a JSON
//! state file:
//!
//! - Configuration and platform paths ([`config`])
//! - Loading and saving editor state ([`store`])
//! - Subcommands and their text output ([`commands`])

pub mod commands;
pub mod config;
pub mod store;

pub use commands::{run, Command, Membership, OrphanCommand, Report};
pub use config::AppConfig;
pub use store::{load_state, save_state};
