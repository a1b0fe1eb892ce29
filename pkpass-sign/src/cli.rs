//! Command line interface for `pkpass-sign`.

use std::{ffi::OsString, path::PathBuf};

use clap::Parser;
use clap_verbosity_flag::Verbosity;

use crate::{Passphrase, SignRequest};

/// The one-line usage message printed on usage errors.
pub const USAGE: &str = "Usage: pkpass-sign -p <pass_dir> -c <certificate_path> -w <certificate_password> -o <output_path> [-i <intermediate_certificate>] [-f] [-h]";

/// An error in the use of the command line interface.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// Help has been requested.
    #[error("Help requested")]
    HelpRequested,

    /// A required option is missing.
    #[error("The \"{0}\" option must be provided")]
    MissingOption(&'static str),

    /// The arguments can not be parsed.
    #[error("Invalid arguments:\n{0}")]
    InvalidArguments(#[from] clap::Error),
}

/// Command line arguments for signing a pass.
///
/// All options are optional at the parser level, so that any missing option leads to the same
/// usage error. Use [`SignRequest::try_from`] to validate them.
#[derive(Debug, Parser)]
#[command(
    name = "pkpass-sign",
    about = "Sign a pass directory and write it as pkpass archive.",
    long_about = "Sign a pass directory and write it as pkpass archive.

The archive contains all files of the pass directory, a manifest.json with their SHA-1 digests
and a detached PKCS#7 signature over the manifest, created with the identity in a PKCS#12
certificate file.",
    disable_help_flag = true,
    version
)]
pub struct Cli {
    /// The path to the unsigned pass directory
    #[arg(env = "PKPASS_DIRECTORY", long = "pass-directory", short = 'p')]
    pub pass_directory: Option<PathBuf>,

    /// The path to the PKCS#12 signing certificate
    #[arg(env = "PKPASS_CERTIFICATE", long, short = 'c')]
    pub certificate: Option<PathBuf>,

    /// The password of the signing certificate
    #[arg(
        env = "PKPASS_CERTIFICATE_PASSWORD",
        hide_env_values = true,
        long,
        short = 'w'
    )]
    pub certificate_password: Option<Passphrase>,

    /// The path to an intermediate certificate (PEM or DER) to embed in the signature
    #[arg(env = "PKPASS_INTERMEDIATE_CERTIFICATE", long, short = 'i')]
    pub intermediate_certificate: Option<PathBuf>,

    /// The path of the signed pass archive
    #[arg(env = "PKPASS_OUTPUT", long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(env = "PKPASS_FORCE", long, short = 'f')]
    pub force: bool,

    /// Show usage and exit
    #[arg(long, short = 'h')]
    pub help: bool,

    /// Global processing log verbosity.
    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Cli {
    /// Parses `args`, of which the first is the name of the executable.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::InvalidArguments`] if `args` can not be parsed, which includes
    /// requests for the version.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::try_parse_from(args)?)
    }
}

impl TryFrom<Cli> for SignRequest {
    type Error = UsageError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.help {
            return Err(UsageError::HelpRequested);
        }

        Ok(Self {
            pass_directory: cli
                .pass_directory
                .ok_or(UsageError::MissingOption("-p"))?,
            certificate: cli.certificate.ok_or(UsageError::MissingOption("-c"))?,
            certificate_password: cli
                .certificate_password
                .ok_or(UsageError::MissingOption("-w"))?,
            intermediate_certificate: cli.intermediate_certificate,
            output: cli.output.ok_or(UsageError::MissingOption("-o"))?,
            force: cli.force,
        })
    }
}
