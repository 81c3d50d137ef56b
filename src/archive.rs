//! Archive extraction
//!
//! Runtime images ship as `.zip` (Windows) or `.tar.gz` (everything else).
//! The format is taken from the file name and, failing that, sniffed from
//! the first bytes of the file.

use flate2::read::GzDecoder;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised while unpacking an archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("unrecognized archive format")]
    UnknownFormat,

    #[error("zip archive is invalid: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl ArchiveError {
    fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Unpacks an archive file into a directory
pub trait Unarchiver: Send + Sync {
    /// Extract `source` into `destination`, creating it if absent
    fn unarchive(&self, source: &Path, destination: &Path) -> Result<(), ArchiveError>;
}

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Guess the format from a file name
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else {
            None
        }
    }

    /// Guess the format from leading magic bytes
    pub fn from_magic(header: &[u8]) -> Option<Self> {
        if header.starts_with(b"PK\x03\x04") || header.starts_with(b"PK\x05\x06") {
            Some(Self::Zip)
        } else if header.starts_with(&[0x1f, 0x8b]) {
            Some(Self::TarGz)
        } else {
            None
        }
    }

    /// Detect the format of a file on disk, name first then contents
    pub fn detect(path: &Path) -> Result<Self, ArchiveError> {
        if let Some(format) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::from_file_name)
        {
            return Ok(format);
        }

        let mut header = [0u8; 4];
        let mut file = File::open(path)
            .map_err(|e| ArchiveError::io(format!("opening {}", path.display()), e))?;
        let read = file
            .read(&mut header)
            .map_err(|e| ArchiveError::io(format!("reading {}", path.display()), e))?;

        Self::from_magic(&header[..read]).ok_or(ArchiveError::UnknownFormat)
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zip => write!(f, "zip"),
            Self::TarGz => write!(f, "tar.gz"),
        }
    }
}

/// Zip and gzip-tar extraction using the `zip`, `flate2` and `tar` crates
#[derive(Debug, Default, Clone, Copy)]
pub struct Extractor;

impl Unarchiver for Extractor {
    fn unarchive(&self, source: &Path, destination: &Path) -> Result<(), ArchiveError> {
        let format = ArchiveFormat::detect(source)?;
        debug!("Extracting {} ({}) into {}", source.display(), format, destination.display());

        fs::create_dir_all(destination)
            .map_err(|e| ArchiveError::io(format!("creating {}", destination.display()), e))?;

        let file = File::open(source)
            .map_err(|e| ArchiveError::io(format!("opening {}", source.display()), e))?;

        match format {
            ArchiveFormat::Zip => {
                let mut archive = zip::ZipArchive::new(file)?;
                archive.extract(destination)?;
            }
            ArchiveFormat::TarGz => {
                let mut archive = tar::Archive::new(GzDecoder::new(file));
                archive
                    .unpack(destination)
                    .map_err(|e| ArchiveError::io("unpacking tarball", e))?;
            }
        }

        Ok(())
    }
}
