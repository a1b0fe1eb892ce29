//! The manifest of a pass bundle.

use std::{collections::BTreeMap, fs::File, io::copy};

use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::{Error, bundle::PassBundle};

/// SHA-1 digests of all files of a [`PassBundle`], keyed by their name in the pass archive.
///
/// Serializes to a flat JSON object, e.g. `{"icon.png":"<hex digest>","pass.json":"<hex
/// digest>"}`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, String>);

impl Manifest {
    /// Creates a [`Manifest`] by hashing every file of `bundle`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file of the bundle can not be read.
    pub fn from_bundle(bundle: &PassBundle) -> Result<Self, Error> {
        let mut entries = BTreeMap::new();
        for file in bundle.files() {
            let io_error = |source| Error::Io {
                context: format!("hashing {}", file.path.display()),
                source,
            };
            let mut reader = File::open(&file.path).map_err(io_error)?;
            let mut hasher = Sha1::new();
            copy(&mut reader, &mut hasher).map_err(io_error)?;
            entries.insert(file.name.clone(), hex::encode(hasher.finalize()));
        }

        Ok(Self(entries))
    }

    /// Returns the hex encoded SHA-1 digest of the file `name`, if it is part of the manifest.
    pub fn digest(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the number of files in the manifest.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the manifest lists no files.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes the manifest to the JSON bytes stored as `manifest.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>, Error> {
        serde_json::to_vec_pretty(self).map_err(Error::Manifest)
    }
}
