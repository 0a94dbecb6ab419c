//! Error handling utilities

use crate::error::{Error, ExitCode};
use tracing::error;

/// Report a fatal error and exit.
///
/// Errors that carry a crate [`Error`] anywhere in their chain exit with its
/// code; everything else exits with [`ExitCode::GENERAL`]. With `verbose >= 1`
/// the full cause chain is printed.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {:#}", error);
    eprintln!("Error: {error:#}");

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code_for(&error))
}

/// Exit code for an error chain
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map(Error::exit_code)
        .unwrap_or(ExitCode::GENERAL)
}
