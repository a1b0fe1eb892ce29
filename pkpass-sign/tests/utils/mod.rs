//! Utilities used for test setups.

#![allow(dead_code)]

use std::{
    fs::{create_dir_all, write},
    path::{Path, PathBuf},
};

use openssl::{
    pkcs7::{Pkcs7, Pkcs7Flags},
    pkcs12::Pkcs12,
    pkey::PKey,
    stack::Stack,
    x509::{X509, store::X509StoreBuilder},
};
use rcgen::{CertifiedKey, generate_simple_self_signed};
use testresult::TestResult;

/// The password of the PKCS#12 file created by [`PassFixture::create`].
pub const CERTIFICATE_PASSWORD: &str = "certificate-password";

/// Files of the pass directory created by [`PassFixture::create`].
pub const PASS_FILES: &[(&str, &str)] = &[
    (
        "pass.json",
        r#"{"formatVersion":1,"passTypeIdentifier":"pass.org.example"}"#,
    ),
    ("icon.png", "not really a png"),
    ("en.lproj/pass.strings", "\"greeting\" = \"Hello\";"),
];

/// A pass directory with a signing identity and an intermediate certificate.
#[derive(Debug)]
pub struct PassFixture {
    /// The unsigned pass directory.
    pub pass_dir: PathBuf,

    /// The PKCS#12 file protected by [`CERTIFICATE_PASSWORD`].
    pub certificate: PathBuf,

    /// The signer certificate contained in [`PassFixture::certificate`].
    pub signer: X509,

    /// A PEM encoded intermediate certificate.
    pub intermediate_pem: PathBuf,

    /// The same intermediate certificate, DER encoded.
    pub intermediate_der: PathBuf,

    /// The intermediate certificate.
    pub intermediate: X509,

    /// The path to write the signed pass to.
    pub output: PathBuf,
}

impl PassFixture {
    /// Creates all fixture files below `dir`.
    pub fn create(dir: &Path) -> TestResult<Self> {
        let pass_dir = dir.join("example.pass");
        for (name, contents) in PASS_FILES {
            let path = pass_dir.join(name);
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            write(path, contents)?;
        }
        write(pass_dir.join(".DS_Store"), "finder junk")?;

        let CertifiedKey { cert, signing_key } =
            generate_simple_self_signed(vec!["pass.org.example".into()])?;
        let signer = X509::from_pem(cert.pem().as_bytes())?;
        let key = PKey::private_key_from_pem(signing_key.serialize_pem().as_bytes())?;
        let pkcs12 = Pkcs12::builder()
            .name("Pass Type ID: pass.org.example")
            .pkey(&key)
            .cert(&signer)
            .build2(CERTIFICATE_PASSWORD)?;
        let certificate = dir.join("certificate.p12");
        write(&certificate, pkcs12.to_der()?)?;

        let CertifiedKey { cert, .. } = generate_simple_self_signed(vec!["wwdr.example".into()])?;
        let intermediate = X509::from_pem(cert.pem().as_bytes())?;
        let intermediate_pem = dir.join("intermediate.pem");
        write(&intermediate_pem, cert.pem())?;
        let intermediate_der = dir.join("intermediate.der");
        write(&intermediate_der, intermediate.to_der()?)?;

        Ok(Self {
            pass_dir,
            certificate,
            signer,
            intermediate_pem,
            intermediate_der,
            intermediate,
            output: dir.join("example.pkpass"),
        })
    }
}

/// Verifies that `signature` is a detached PKCS#7 signature by `signer` over `manifest`.
///
/// Returns the DER encoding of all certificates embedded in the signature.
pub fn verify_signature(
    signature: &[u8],
    manifest: &[u8],
    signer: &X509,
) -> TestResult<Vec<Vec<u8>>> {
    let pkcs7 = Pkcs7::from_der(signature)?;
    let store = X509StoreBuilder::new()?.build();
    let extra = Stack::<X509>::new()?;
    pkcs7.verify(
        &extra,
        &store,
        Some(manifest),
        None,
        Pkcs7Flags::BINARY | Pkcs7Flags::NOVERIFY,
    )?;

    let signers = pkcs7.signers(&extra, Pkcs7Flags::empty())?;
    assert_eq!(signers.len(), 1);
    let signer_der = signers.iter().next().map(|cert| cert.to_der()).transpose()?;
    assert_eq!(signer_der, Some(signer.to_der()?));

    let mut embedded = Vec::new();
    if let Some(certificates) = pkcs7.signed().and_then(|signed| signed.certificates()) {
        for certificate in certificates {
            embedded.push(certificate.to_der()?);
        }
    }
    Ok(embedded)
}
