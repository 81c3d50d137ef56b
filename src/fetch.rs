//! Download and unpack one runtime archive
//!
//! The archive lands in a private scratch directory which is removed on
//! every exit path. Extraction goes into a staging directory next to the
//! destination and is renamed into place only once it succeeded, so the
//! destination either appears complete or not at all.

use crate::archive::Unarchiver;
use crate::catalog::BinaryDescriptor;
use crate::error::{RtfetchError, RtfetchResult};
use crate::transport::Transport;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Downloads artifacts with the download transport and unpacks them
#[derive(Clone)]
pub struct ArchiveFetcher {
    transport: Arc<dyn Transport>,
    unarchiver: Arc<dyn Unarchiver>,
}

impl ArchiveFetcher {
    pub fn new(transport: Arc<dyn Transport>, unarchiver: Arc<dyn Unarchiver>) -> Self {
        Self {
            transport,
            unarchiver,
        }
    }

    /// Download `descriptor` and extract it into `destination`.
    ///
    /// On error `destination` is left absent.
    pub fn fetch_and_extract(
        &self,
        descriptor: &BinaryDescriptor,
        destination: &Path,
    ) -> RtfetchResult<()> {
        let scratch = tempfile::Builder::new()
            .prefix("rtfetch-")
            .tempdir()
            .map_err(|e| RtfetchError::io("creating scratch directory", e))?;
        let archive = scratch.path().join(scratch_file_name(&descriptor.file_name));

        let bytes = self.download(&descriptor.link, &archive)?;
        info!("Downloaded {} ({} bytes)", descriptor.file_name, bytes);

        self.extract(&archive, destination)?;
        info!("Extracted {} to {}", descriptor.file_name, destination.display());

        // scratch is dropped here and on every early return above
        Ok(())
    }

    fn download(&self, url: &str, archive: &Path) -> RtfetchResult<u64> {
        let mut body = self
            .transport
            .get(url)
            .map_err(|e| RtfetchError::DownloadFailed {
                url: url.to_string(),
                reason: e.reason,
            })?;

        let file = File::create(archive)
            .map_err(|e| RtfetchError::io(format!("creating {}", archive.display()), e))?;
        let mut writer = BufWriter::new(file);

        let bytes = io::copy(&mut body, &mut writer)
            .and_then(|n| writer.flush().map(|_| n))
            .map_err(|e| RtfetchError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Wrote {} bytes to {}", bytes, archive.display());
        Ok(bytes)
    }

    fn extract(&self, archive: &Path, destination: &Path) -> RtfetchResult<()> {
        let parent = destination.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .map_err(|e| RtfetchError::io(format!("creating {}", parent.display()), e))?;

        // Dot-prefixed so cache listings skip it; removed on drop if we bail out
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(parent)
            .map_err(|e| RtfetchError::io(format!("creating staging directory in {}", parent.display()), e))?;

        self.unarchiver
            .unarchive(archive, staging.path())
            .map_err(|source| RtfetchError::ExtractionFailed {
                archive: archive.to_path_buf(),
                source,
            })?;

        let staged = staging.keep();
        if let Err(e) = fs::rename(&staged, destination) {
            let _ = fs::remove_dir_all(&staged);
            return Err(RtfetchError::io(
                format!("moving extracted runtime into {}", destination.display()),
                e,
            ));
        }

        Ok(())
    }
}

/// File name for the downloaded archive inside the scratch directory.
///
/// Keeps the catalog name (so the extension still identifies the format)
/// but never lets it escape the scratch directory.
fn scratch_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or("archive");
    base.to_string()
}
