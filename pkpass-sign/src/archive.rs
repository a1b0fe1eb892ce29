//! Writing of signed pass archives.

use std::{
    fs::File,
    io::{Seek, Write, copy},
    path::Path,
};

use tempfile::NamedTempFile;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    Error,
    bundle::{MANIFEST_FILE, PassBundle, SIGNATURE_FILE},
};

/// Writes the pass archive for `bundle` with `manifest` and `signature` to `output`.
///
/// The archive is first written to a temporary file in the directory of `output` and then
/// moved into place. If `force` is `true` an existing `output` is replaced, otherwise it is
/// left untouched.
///
/// # Errors
///
/// Returns an error if
/// - `output` exists and `force` is `false`,
/// - the temporary file can not be created,
/// - a bundle file can not be read,
/// - writing the archive fails,
/// - or the archive can not be moved to `output`.
pub fn write_archive(
    bundle: &PassBundle,
    manifest: &[u8],
    signature: &[u8],
    output: &Path,
    force: bool,
) -> Result<(), Error> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|source| Error::Io {
        context: format!("creating a temporary file in {}", dir.display()),
        source,
    })?;

    write_zip(temp.as_file_mut(), bundle, manifest, signature)?;
    temp.as_file().sync_all().map_err(|source| Error::Io {
        context: format!("syncing {}", temp.path().display()),
        source,
    })?;

    let persisted = if force {
        temp.persist(output)
    } else {
        temp.persist_noclobber(output)
    };
    persisted.map_err(|error| {
        if error.error.kind() == std::io::ErrorKind::AlreadyExists {
            Error::OutputFileExists(output.to_path_buf())
        } else {
            Error::Persist {
                path: output.to_path_buf(),
                source: error.error,
            }
        }
    })?;

    Ok(())
}

fn write_zip(
    writer: impl Write + Seek,
    bundle: &PassBundle,
    manifest: &[u8],
    signature: &[u8],
) -> Result<(), Error> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    for file in bundle.files() {
        zip.start_file(file.name.as_str(), options)?;
        let mut reader = File::open(&file.path).map_err(|source| Error::Io {
            context: format!("opening {}", file.path.display()),
            source,
        })?;
        copy(&mut reader, &mut zip).map_err(|source| Error::Io {
            context: format!("archiving {}", file.path.display()),
            source,
        })?;
    }

    for (name, data) in [(MANIFEST_FILE, manifest), (SIGNATURE_FILE, signature)] {
        zip.start_file(name, options)?;
        zip.write_all(data).map_err(|source| Error::Io {
            context: format!("archiving {name}"),
            source,
        })?;
    }

    zip.finish()?;
    Ok(())
}
