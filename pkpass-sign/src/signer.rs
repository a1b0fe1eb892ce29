//! Signing of pass bundles.

use std::path::PathBuf;

use crate::{
    Error,
    Passphrase,
    archive::write_archive,
    bundle::PassBundle,
    identity::SigningIdentity,
    manifest::Manifest,
    signature::sign_manifest,
};

/// The inputs for signing one pass bundle.
#[derive(Clone, Debug)]
pub struct SignRequest {
    /// The unsigned pass directory.
    pub pass_directory: PathBuf,

    /// The PKCS#12 file containing the signer certificate and its private key.
    pub certificate: PathBuf,

    /// The password of [`SignRequest::certificate`].
    pub certificate_password: Passphrase,

    /// An optional intermediate certificate to embed in the signature.
    pub intermediate_certificate: Option<PathBuf>,

    /// The path of the signed pass archive.
    pub output: PathBuf,

    /// Whether to overwrite an existing [`SignRequest::output`].
    pub force: bool,
}

/// Something that turns a [`SignRequest`] into a signed pass archive.
pub trait PassSigner {
    /// Signs the pass bundle described by `request`.
    ///
    /// # Errors
    ///
    /// If the operation fails, the implementation should return an appropriate error.
    fn sign(&self, request: &SignRequest) -> Result<(), Error>;
}

/// A [`PassSigner`] using a PKCS#12 signing identity.
///
/// Writes a ZIP archive with all bundle files, a `manifest.json` of their SHA-1 digests and a
/// detached PKCS#7 `signature` over the manifest.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pkcs12Signer;

impl PassSigner for Pkcs12Signer {
    /// Signs the pass bundle described by `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if
    /// - the output exists and [`SignRequest::force`] is not set,
    /// - the pass directory is not a valid [`PassBundle`],
    /// - the [`Manifest`] can not be created,
    /// - the [`SigningIdentity`] or the intermediate certificate can not be loaded,
    /// - the manifest can not be signed,
    /// - or the archive can not be written.
    fn sign(&self, request: &SignRequest) -> Result<(), Error> {
        if request.output.exists() {
            if !request.force {
                return Err(Error::OutputFileExists(request.output.clone()));
            }
            log::warn!("Overwriting existing output {}", request.output.display());
        }

        let bundle = PassBundle::from_dir(&request.pass_directory)?;
        let manifest = Manifest::from_bundle(&bundle)?.to_json()?;

        let mut identity =
            SigningIdentity::from_pkcs12_file(&request.certificate, &request.certificate_password)?;
        if let Some(intermediate) = &request.intermediate_certificate {
            identity = identity.with_intermediate_file(intermediate)?;
        }
        log::debug!("Loaded signing identity {identity:?}");

        let signature = sign_manifest(&identity, &manifest)?;
        write_archive(
            &bundle,
            &manifest,
            &signature,
            &request.output,
            request.force,
        )?;

        log::info!(
            "Signed pass {} to {}",
            bundle.root().display(),
            request.output.display()
        );
        Ok(())
    }
}
