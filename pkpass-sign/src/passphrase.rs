//! Certificate password handling.

use std::{convert::Infallible, fmt::Display, str::FromStr};

use secrecy::{ExposeSecret, SecretString};

/// The password protecting a PKCS#12 certificate file.
///
/// The password is held by a [`SecretString`], which guarantees zeroing of memory on
/// destruct. Neither [`Debug`] nor [`Display`] reveal it.
#[derive(Clone, Debug)]
pub struct Passphrase(SecretString);

impl Passphrase {
    /// Creates a new [`Passphrase`] from owned [`String`]
    ///
    /// # Examples
    /// ```
    /// use pkpass_sign::Passphrase;
    ///
    /// let passphrase = Passphrase::new("certificate-password".to_string());
    /// assert_eq!(passphrase.expose_borrowed(), "certificate-password");
    /// ```
    pub fn new(passphrase: String) -> Self {
        Self(SecretString::new(passphrase.into()))
    }

    /// Exposes the secret passphrase as borrowed [`str`]
    pub fn expose_borrowed(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Display for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl FromStr for Passphrase {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(SecretString::from(s.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn passphrase_is_redacted() -> TestResult {
        let passphrase = Passphrase::from_str("hunter2")?;
        assert_eq!(format!("{passphrase}"), "[REDACTED]");
        assert!(!format!("{passphrase:?}").contains("hunter2"));
        assert_eq!(passphrase.expose_borrowed(), "hunter2");
        Ok(())
    }
}
