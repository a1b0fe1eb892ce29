//! Errors of pass signing.

use std::path::PathBuf;

/// An error that may occur when signing a pass bundle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error.
    #[error("I/O error while {context}:\n{source}")]
    Io {
        /// The context in which the error occurred.
        ///
        /// This is meant to complete the sentence "I/O error while ".
        context: String,

        /// The source error.
        source: std::io::Error,
    },

    /// The pass directory does not exist or is not a directory.
    #[error("The pass directory {0} does not exist or is not a directory")]
    NotADirectory(PathBuf),

    /// The pass directory does not contain a `pass.json`.
    #[error("The pass directory {0} does not contain a pass.json")]
    MissingPassJson(PathBuf),

    /// The `pass.json` of a pass directory is not valid JSON.
    #[error("The pass definition {path} is not valid JSON:\n{source}")]
    InvalidPassJson {
        /// The path of the invalid `pass.json`.
        path: PathBuf,

        /// The source error.
        source: serde_json::Error,
    },

    /// A file in the pass directory has a name that is not valid UTF-8.
    #[error("The path {0} is not valid UTF-8")]
    NonUtf8Path(PathBuf),

    /// The pass directory can not be traversed.
    #[error("Unable to read the pass directory:\n{0}")]
    Walk(#[from] walkdir::Error),

    /// The manifest can not be serialized.
    #[error("Unable to serialize the manifest:\n{0}")]
    Manifest(#[source] serde_json::Error),

    /// A certificate or the signing identity can not be loaded.
    #[error("Unable to load {context}:\n{source}")]
    Certificate {
        /// The context in which the error occurred.
        ///
        /// This is meant to complete the sentence "Unable to load ".
        context: String,

        /// The source error.
        source: openssl::error::ErrorStack,
    },

    /// The PKCS#12 file does not contain a private key.
    #[error("The certificate file {0} does not contain a private key")]
    MissingPrivateKey(PathBuf),

    /// The PKCS#12 file does not contain a certificate.
    #[error("The certificate file {0} does not contain a certificate")]
    MissingCertificate(PathBuf),

    /// The signature over the manifest can not be created.
    #[error("Unable to sign the manifest:\n{0}")]
    Signature(#[source] openssl::error::ErrorStack),

    /// The pass archive can not be written.
    #[error("Unable to write the pass archive:\n{0}")]
    Archive(#[from] zip::result::ZipError),

    /// The output file exists and overwriting it has not been requested.
    #[error("The output file exists already: {0}")]
    OutputFileExists(PathBuf),

    /// The finished pass archive can not be moved to the output path.
    #[error("Unable to move the pass archive to {path}:\n{source}")]
    Persist {
        /// The output path.
        path: PathBuf,

        /// The source error.
        source: std::io::Error,
    },
}
