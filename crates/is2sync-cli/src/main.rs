use is2sync_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Log file under XDG state, or stderr when that is unavailable.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("log file unavailable, logging to stderr: {:#}", e);
    }

    if let Err(err) = Cli::run_from_args() {
        eprintln!("is2sync error: {:#}", err);
        std::process::exit(1);
    }
}
