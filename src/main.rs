//! pkg-cleaner: prune a package tree down to a whitelist of glob patterns.
//!
//! This is the main entry point for the `pkg-cleaner` CLI. It parses
//! arguments, sets up logging, dispatches to the command handler, and maps
//! errors to exit codes.

mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod exit_codes;
pub mod fs;
pub mod keepset;
pub mod logging;
pub mod patterns;
pub mod walk;

#[cfg(test)]
mod test_support;

use cli::Cli;
use error::format_chain;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init_logger(cli.command.common().verbose);

    ExitCode::from(finish(commands::dispatch(cli.command)))
}

/// Log and print a failed run, then map it to the process exit status.
fn finish(result: error::Result<()>) -> u8 {
    match result {
        Ok(()) => exit_codes::SUCCESS as u8,
        Err(err) => {
            let chain = format_chain(&err);
            tracing::error!(exit_code = err.exit_code(), "{}", chain);
            eprintln!("Error: {}", chain);
            err.exit_code() as u8
        }
    }
}
