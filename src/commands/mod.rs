//! Command implementations for pkg-cleaner.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod clean;
mod copy;

#[cfg(test)]
mod tests;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Clean(args) => clean::cmd_clean(args),
        Command::Copy(args) => copy::cmd_copy(args),
        Command::Move(args) => copy::cmd_move(args),
    }
}
