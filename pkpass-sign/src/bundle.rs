//! Pass bundle discovery.

use std::{
    fs::read,
    path::{Path, PathBuf},
};

use walkdir::{DirEntry, WalkDir};

use crate::Error;

/// The file name of the pass definition, which every bundle must contain.
pub const PASS_JSON: &str = "pass.json";

/// The file name of the manifest in a signed pass archive.
pub const MANIFEST_FILE: &str = "manifest.json";

/// The file name of the signature in a signed pass archive.
pub const SIGNATURE_FILE: &str = "signature";

/// A single file of a [`PassBundle`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BundleFile {
    /// The name of the file in the pass archive.
    ///
    /// This is the path relative to the pass directory, using `/` as separator.
    pub name: String,

    /// The location of the file on the filesystem.
    pub path: PathBuf,
}

/// The files of an unsigned pass directory.
#[derive(Clone, Debug)]
pub struct PassBundle {
    root: PathBuf,
    files: Vec<BundleFile>,
}

impl PassBundle {
    /// Collects the files of the pass directory `dir`.
    ///
    /// The directory is traversed recursively, without following symlinks to directories.
    /// Hidden entries (such as `.DS_Store`) are skipped, as are a `manifest.json` and a
    /// `signature` at the top level, which are left over from a previous signing.
    /// The files are sorted by their name in the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if
    /// - `dir` is not a directory,
    /// - the directory can not be traversed,
    /// - a file name is not valid UTF-8,
    /// - the directory does not contain a `pass.json`,
    /// - or the `pass.json` is not valid JSON.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let root = dir.as_ref();
        if !root.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry));
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() && !is_file_symlink(&entry) {
                continue;
            }

            let name = archive_name(root, entry.path())?;
            if name == MANIFEST_FILE || name == SIGNATURE_FILE {
                log::debug!("Skipping stale {name} in {}", root.display());
                continue;
            }

            files.push(BundleFile {
                name,
                path: entry.into_path(),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));

        let bundle = Self {
            root: root.to_path_buf(),
            files,
        };
        bundle.check_pass_json()?;

        log::debug!(
            "Found {} files in pass directory {}",
            bundle.files.len(),
            root.display()
        );
        Ok(bundle)
    }

    /// Returns the pass directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the files of the bundle, sorted by name.
    pub fn files(&self) -> &[BundleFile] {
        &self.files
    }

    fn check_pass_json(&self) -> Result<(), Error> {
        let Some(pass_json) = self.files.iter().find(|file| file.name == PASS_JSON) else {
            return Err(Error::MissingPassJson(self.root.clone()));
        };

        let data = read(&pass_json.path).map_err(|source| Error::Io {
            context: format!("reading {}", pass_json.path.display()),
            source,
        })?;
        serde_json::from_slice::<serde_json::Value>(&data).map_err(|source| {
            Error::InvalidPassJson {
                path: pass_json.path.clone(),
                source,
            }
        })?;

        Ok(())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().first() == Some(&b'.')
}

fn is_file_symlink(entry: &DirEntry) -> bool {
    entry.path_is_symlink() && entry.path().is_file()
}

/// Returns the path of `path` relative to `root`, joined with `/`.
fn archive_name(root: &Path, path: &Path) -> Result<String, Error> {
    // walkdir only yields paths below root
    let relative = path.strip_prefix(root).unwrap_or(path);

    let mut parts = Vec::new();
    for component in relative.components() {
        let Some(part) = component.as_os_str().to_str() else {
            return Err(Error::NonUtf8Path(path.to_path_buf()));
        };
        parts.push(part);
    }

    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, write};

    use rstest::rstest;
    use testdir::testdir;
    use testresult::TestResult;

    use super::*;

    fn write_files(dir: &Path, files: &[(&str, &str)]) -> TestResult {
        for (name, contents) in files {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            write(path, contents)?;
        }
        Ok(())
    }

    #[test]
    fn bundle_lists_nested_files_sorted() -> TestResult {
        let dir = testdir!();
        write_files(
            &dir,
            &[
                ("pass.json", "{}"),
                ("icon.png", "icon"),
                ("en.lproj/pass.strings", "\"a\" = \"b\";"),
                ("de.lproj/pass.strings", "\"a\" = \"c\";"),
            ],
        )?;

        let bundle = PassBundle::from_dir(&dir)?;
        let names: Vec<&str> = bundle.files().iter().map(|file| file.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "de.lproj/pass.strings",
                "en.lproj/pass.strings",
                "icon.png",
                "pass.json"
            ]
        );
        assert_eq!(bundle.root(), dir.as_path());
        Ok(())
    }

    #[test]
    fn bundle_skips_hidden_and_stale_files() -> TestResult {
        let dir = testdir!();
        write_files(
            &dir,
            &[
                ("pass.json", "{}"),
                (".DS_Store", "junk"),
                (".git/config", "junk"),
                ("manifest.json", "{}"),
                ("signature", "old"),
                ("en.lproj/signature", "kept"),
            ],
        )?;

        let bundle = PassBundle::from_dir(&dir)?;
        let names: Vec<&str> = bundle.files().iter().map(|file| file.name.as_str()).collect();
        assert_eq!(names, ["en.lproj/signature", "pass.json"]);
        Ok(())
    }

    #[rstest]
    #[case::missing(None)]
    #[case::not_json(Some("this is not json"))]
    fn bundle_requires_valid_pass_json(#[case] pass_json: Option<&str>) -> TestResult {
        let dir = testdir!();
        write_files(&dir, &[("icon.png", "icon")])?;
        if let Some(contents) = pass_json {
            write(dir.join(PASS_JSON), contents)?;
        }

        match (PassBundle::from_dir(&dir), pass_json) {
            (Err(Error::MissingPassJson(_)), None) => {}
            (Err(Error::InvalidPassJson { .. }), Some(_)) => {}
            (result, _) => panic!("unexpected result: {result:?}"),
        }
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn bundle_rejects_non_utf8_file_names() -> TestResult {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let dir = testdir!();
        write_files(&dir, &[("pass.json", "{}")])?;
        write(dir.join(OsStr::from_bytes(b"ic\xffon.png")), "icon")?;

        assert!(matches!(
            PassBundle::from_dir(&dir),
            Err(Error::NonUtf8Path(_))
        ));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn bundle_skips_hidden_non_utf8_entries() -> TestResult {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let dir = testdir!();
        write_files(&dir, &[("pass.json", "{}")])?;
        write(dir.join(OsStr::from_bytes(b".\xff")), "junk")?;
        create_dir_all(dir.join(OsStr::from_bytes(b".cache\xff")))?;
        write(dir.join(OsStr::from_bytes(b".cache\xff/ic\xffon.png")), "junk")?;

        let bundle = PassBundle::from_dir(&dir)?;
        let names: Vec<&str> = bundle.files().iter().map(|file| file.name.as_str()).collect();
        assert_eq!(names, ["pass.json"]);
        Ok(())
    }

    #[test]
    fn bundle_requires_directory() -> TestResult {
        let dir = testdir!();
        let file = dir.join("pass.json");
        write(&file, "{}")?;

        assert!(matches!(
            PassBundle::from_dir(&file),
            Err(Error::NotADirectory(_))
        ));
        assert!(matches!(
            PassBundle::from_dir(dir.join("missing")),
            Err(Error::NotADirectory(_))
        ));
        Ok(())
    }
}
