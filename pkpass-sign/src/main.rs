//! Application for signing a pass directory into a pkpass archive.

use std::process::ExitCode;

use clap::error::ErrorKind;
use pkpass_common::logging::setup_logging;
use pkpass_sign::{
    Pkcs12Signer,
    cli::{Cli, USAGE, UsageError},
    launcher::{Error, run},
};

/// Signs the pass directory given on the command line.
///
/// Prints the usage message and fails if help is requested or the arguments are incomplete.
fn main() -> ExitCode {
    let result = match Cli::try_parse_args(std::env::args_os()) {
        Ok(args) => {
            let max_level = args.verbosity.log_level_filter();
            if let Err(error) = setup_logging(env!("CARGO_BIN_NAME"), max_level) {
                eprintln!("{error}");
                return ExitCode::FAILURE;
            }
            run(args, &Pkcs12Signer)
        }
        Err(UsageError::InvalidArguments(error)) if error.kind() == ErrorKind::DisplayVersion => {
            print!("{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => Err(Error::Usage(error)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Usage(error)) => {
            log::debug!("{error}");
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
        Err(Error::Sign(error)) => {
            log::error!(error:err; "Signing pass failed: {error}");
            ExitCode::FAILURE
        }
    }
}
