//! Subcommand implementations.

pub mod listen;
pub mod login;
