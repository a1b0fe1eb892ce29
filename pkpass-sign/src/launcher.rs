//! Launching a single signing operation from command line arguments.

use crate::{
    PassSigner,
    SignRequest,
    cli::{Cli, UsageError},
};

/// An error that may occur when launching a signing operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command line interface has been used incorrectly.
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// The signer failed.
    #[error("Signing failed: {0}")]
    Sign(#[from] crate::Error),
}

/// Validates the command line arguments `cli` and signs once with `signer`.
///
/// # Errors
///
/// Returns an error if
/// - help is requested or a required option is missing in `cli`,
/// - or `signer` fails.
pub fn run(cli: Cli, signer: &impl PassSigner) -> Result<(), Error> {
    let request = SignRequest::try_from(cli)?;
    log::debug!(
        "Signing {} with {} to {} (force: {})",
        request.pass_directory.display(),
        request.certificate.display(),
        request.output.display(),
        request.force
    );

    signer.sign(&request)?;
    Ok(())
}
