//! scorefill command-line front end: configuration and commands.

pub mod commands;
pub mod config;
