//! Signatures over pass manifests.

use openssl::{
    pkcs7::{Pkcs7, Pkcs7Flags},
    stack::Stack,
    x509::X509,
};

use crate::{Error, identity::SigningIdentity};

/// Creates a detached PKCS#7 signature over `manifest` using `identity`.
///
/// The manifest is signed in binary mode, so that its bytes are not altered by MIME
/// canonicalization. The signer certificate and all chain certificates of `identity` are
/// embedded in the signature.
///
/// Returns the DER encoded signature.
///
/// # Errors
///
/// Returns an error if the signature can not be created or encoded.
pub fn sign_manifest(identity: &SigningIdentity, manifest: &[u8]) -> Result<Vec<u8>, Error> {
    let mut chain = Stack::<X509>::new().map_err(Error::Signature)?;
    for certificate in identity.chain() {
        chain.push(certificate.clone()).map_err(Error::Signature)?;
    }

    let signature = Pkcs7::sign(
        identity.certificate(),
        identity.private_key(),
        &chain,
        manifest,
        Pkcs7Flags::BINARY | Pkcs7Flags::DETACHED,
    )
    .and_then(|pkcs7| pkcs7.to_der())
    .map_err(Error::Signature)?;

    log::debug!("Created manifest signature of {} bytes", signature.len());
    Ok(signature)
}
