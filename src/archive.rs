//! # Archive Writer
//!
//! Packs a directory into a compressed zip file with the directory's contents
//! at the archive root: `repos/alpha/src/lib.rs` is stored as `src/lib.rs`,
//! never as `alpha/src/lib.rs`.
//!
//! The [`ArchiveWriter`] trait is the seam the archive stage is written
//! against; [`ZipArchiveWriter`] is the implementation backed by the `zip` and
//! `walkdir` crates.
//!
//! ## Failure Handling
//!
//! A file that disappears between the directory walk and the moment it is read
//! is logged, counted in [`ArchiveStats::skipped`] and left out; the archive is
//! still produced. Any other error aborts the archive, and the partially
//! written destination file is removed so a truncated zip is never left behind.

use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Seek, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// What went into a finished archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub files: usize,
    pub directories: usize,
    /// Paths that vanished while packing and were left out.
    pub skipped: Vec<PathBuf>,
}

/// Builds one archive from one directory - allows mocking in tests
pub trait ArchiveWriter {
    /// Packs the full recursive contents of `source_dir` into `dest_file`,
    /// replacing any existing file. `compression_level` ranges from 0 (stored
    /// without compression) to 9 (smallest output).
    fn create_archive(
        &self,
        source_dir: &Path,
        dest_file: &Path,
        compression_level: u8,
    ) -> Result<ArchiveStats>;
}

/// Writes deflate-compressed `.zip` archives, or stored ones at level 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiveWriter;

impl ArchiveWriter for ZipArchiveWriter {
    fn create_archive(
        &self,
        source_dir: &Path,
        dest_file: &Path,
        compression_level: u8,
    ) -> Result<ArchiveStats> {
        if !source_dir.is_dir() {
            return Err(Error::Archive {
                path: source_dir.to_path_buf(),
                message: "source is not a directory".to_string(),
            });
        }
        if let Some(parent) = dest_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let result = write_zip(source_dir, dest_file, compression_level);
        if result.is_err() && dest_file.exists() {
            if let Err(e) = fs::remove_file(dest_file) {
                warn!(
                    "Could not remove incomplete archive {}: {}",
                    dest_file.display(),
                    e
                );
            }
        }
        result
    }
}

fn write_zip(source_dir: &Path, dest_file: &Path, compression_level: u8) -> Result<ArchiveStats> {
    let archive_error = |message: String| Error::Archive {
        path: dest_file.to_path_buf(),
        message,
    };

    let file = File::create(dest_file)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = file_options(compression_level);

    let mut stats = ArchiveStats::default();

    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_not_found(&e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                warn!("Skipping {}: vanished while archiving", path.display());
                stats.skipped.push(path);
                continue;
            }
            Err(e) => return Err(archive_error(e.to_string())),
        };

        let name = archive_name(source_dir, entry.path())?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            zip.add_directory(format!("{}/", name), options)
                .map_err(|e| archive_error(e.to_string()))?;
            stats.directories += 1;
        } else if file_type.is_symlink() {
            let target = match fs::read_link(entry.path()) {
                Ok(target) => target,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!("Skipping {}: vanished while archiving", entry.path().display());
                    stats.skipped.push(entry.path().to_path_buf());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            zip.add_symlink(name, target.to_string_lossy().into_owned(), options)
                .map_err(|e| archive_error(e.to_string()))?;
            stats.files += 1;
        } else if append_file(&mut zip, &name, entry.path(), options)? {
            stats.files += 1;
        } else {
            warn!("Skipping {}: vanished while archiving", entry.path().display());
            stats.skipped.push(entry.path().to_path_buf());
        }
    }

    let mut writer = zip.finish().map_err(|e| archive_error(e.to_string()))?;
    writer.flush()?;

    debug!(
        "Wrote {} ({} files, {} directories)",
        dest_file.display(),
        stats.files,
        stats.directories
    );
    Ok(stats)
}

/// Entry options for `compression_level`. Deflate has no level 0, so that
/// level stores entries uncompressed.
fn file_options(compression_level: u8) -> SimpleFileOptions {
    let options = SimpleFileOptions::default();
    if compression_level == 0 {
        options.compression_method(CompressionMethod::Stored)
    } else {
        options
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level.into()))
    }
}

/// Copy one file into the archive under `name`.
///
/// Returns `Ok(false)` without writing an entry when the file no longer exists.
fn append_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    path: &Path,
    options: SimpleFileOptions,
) -> Result<bool> {
    let mut source = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    let options = with_permissions(options, &source);
    zip.start_file(name, options).map_err(|e| Error::Archive {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    io::copy(&mut source, zip)?;
    Ok(true)
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, file: &File) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;

    match file.metadata() {
        Ok(metadata) => options.unix_permissions(metadata.permissions().mode()),
        Err(_) => options,
    }
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _file: &File) -> SimpleFileOptions {
    options
}

/// Entry name of `path` relative to `root`, always `/`-separated.
fn archive_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| Error::Archive {
        path: path.to_path_buf(),
        message: format!("not inside {}", root.display()),
    })?;

    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == ErrorKind::NotFound)
}
