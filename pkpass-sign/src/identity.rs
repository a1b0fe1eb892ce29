//! Loading of signing identities and certificates.

use std::{fmt, fs::read, path::Path};

use openssl::{
    pkcs12::Pkcs12,
    pkey::{PKey, Private},
    x509::X509,
};

use crate::{Error, Passphrase};

/// A signer certificate with its private key and the chain certificates to embed in signatures.
pub struct SigningIdentity {
    certificate: X509,
    private_key: PKey<Private>,
    chain: Vec<X509>,
}

impl SigningIdentity {
    /// Loads a [`SigningIdentity`] from the PKCS#12 file at `path`, unlocked with `password`.
    ///
    /// Certificates in the PKCS#12 CA bag become chain certificates.
    ///
    /// # Errors
    ///
    /// Returns an error if
    /// - the file can not be read,
    /// - the file is not valid PKCS#12 or `password` is wrong,
    /// - or the file contains no private key or no certificate.
    pub fn from_pkcs12_file(path: impl AsRef<Path>, password: &Passphrase) -> Result<Self, Error> {
        let path = path.as_ref();
        let der = read(path).map_err(|source| Error::Io {
            context: format!("reading certificate file {}", path.display()),
            source,
        })?;

        let certificate_error = |source| Error::Certificate {
            context: format!("certificate file {}", path.display()),
            source,
        };
        let parsed = Pkcs12::from_der(&der)
            .and_then(|pkcs12| pkcs12.parse2(password.expose_borrowed()))
            .map_err(certificate_error)?;

        let private_key = parsed
            .pkey
            .ok_or_else(|| Error::MissingPrivateKey(path.to_path_buf()))?;
        let certificate = parsed
            .cert
            .ok_or_else(|| Error::MissingCertificate(path.to_path_buf()))?;
        let chain = parsed
            .ca
            .map(|stack| stack.into_iter().collect())
            .unwrap_or_default();

        Ok(Self {
            certificate,
            private_key,
            chain,
        })
    }

    /// Adds an intermediate certificate from `path` to the chain.
    ///
    /// The certificate may be PEM or DER encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can not be read or does not contain a certificate.
    pub fn with_intermediate_file(mut self, path: impl AsRef<Path>) -> Result<Self, Error> {
        let intermediate = load_certificate(path.as_ref())?;
        self.chain.push(intermediate);
        Ok(self)
    }

    /// Returns the signer certificate.
    pub fn certificate(&self) -> &X509 {
        &self.certificate
    }

    /// Returns the private key of the signer certificate.
    pub fn private_key(&self) -> &PKey<Private> {
        &self.private_key
    }

    /// Returns the chain certificates.
    pub fn chain(&self) -> &[X509] {
        &self.chain
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("certificate", &self.certificate.subject_name())
            .field("private_key", &"[REDACTED]")
            .field("chain", &self.chain.len())
            .finish()
    }
}

/// Loads a PEM or DER encoded X.509 certificate from `path`.
fn load_certificate(path: &Path) -> Result<X509, Error> {
    let data = read(path).map_err(|source| Error::Io {
        context: format!("reading certificate {}", path.display()),
        source,
    })?;

    if data.trim_ascii_start().starts_with(b"-----BEGIN") {
        X509::from_pem(&data)
    } else {
        X509::from_der(&data)
    }
    .map_err(|source| Error::Certificate {
        context: format!("certificate {}", path.display()),
        source,
    })
}
