//! roadrouter CLI library.
//!
//! Subcommand handlers, output formatting, and terminal styling for the
//! `roadrouter` binary.

pub mod commands;
pub mod output;
pub mod terminal;
