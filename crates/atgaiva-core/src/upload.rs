//! Upload surface: turns a user-chosen file into an [`ImagePayload`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::payload::ImagePayload;

/// Media types the restoration model is known to accept.
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Extensions matching [`ACCEPTED_MEDIA_TYPES`], for native file dialogs.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file offered to the upload surface, read fully into memory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// Read a file from disk; the media type comes from its extension.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = fs::read(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }

    /// Wrap bytes that are already in memory. A blank media type is guessed from the name.
    pub fn from_memory(name: impl Into<String>, media_type: &str, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = if media_type.trim().is_empty() {
            mime_guess::from_path(&name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        } else {
            media_type.trim().to_ascii_lowercase()
        };

        Self {
            name,
            media_type,
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Accepts a single image file and reports its payload to the owner.
pub struct UploadSurface<F>
where
    F: FnMut(ImagePayload),
{
    on_selected: F,
}

impl<F> UploadSurface<F>
where
    F: FnMut(ImagePayload),
{
    pub fn new(on_selected: F) -> Self {
        Self { on_selected }
    }

    /// Report `file` if it is an image. Non-image media types are a silent no-op.
    ///
    /// Returns whether the callback fired.
    pub fn process_file(&mut self, file: SourceFile) -> bool {
        if !file.is_image() {
            debug!(name = %file.name, media_type = %file.media_type, "Ignoring non-image file");
            return false;
        }

        info!(
            name = %file.name,
            media_type = %file.media_type,
            bytes = file.bytes.len(),
            "Image selected"
        );
        let payload = ImagePayload::from_bytes(file.media_type, &file.bytes);
        (self.on_selected)(payload);
        true
    }

    /// Handle a drop: only the first file counts.
    pub fn drop_files(&mut self, files: impl IntoIterator<Item = SourceFile>) -> bool {
        match files.into_iter().next() {
            Some(file) => self.process_file(file),
            None => false,
        }
    }

    /// Handle a picker selection: only the first file counts.
    pub fn select_files(&mut self, files: impl IntoIterator<Item = SourceFile>) -> bool {
        self.drop_files(files)
    }

    /// Read `path` and process it.
    pub fn select_path(&mut self, path: &Path) -> Result<bool, UploadError> {
        let file = SourceFile::from_path(path)?;
        Ok(self.process_file(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn non_image_files_never_reach_the_callback() {
        let calls = RefCell::new(0);
        let mut surface = UploadSurface::new(|_| *calls.borrow_mut() += 1);

        for (name, media_type) in [
            ("notes.txt", "text/plain"),
            ("clip.mp4", "video/mp4"),
            ("doc.pdf", "application/pdf"),
            ("unknown.bin", ""),
        ] {
            let file = SourceFile::from_memory(name, media_type, vec![1, 2, 3]);
            assert!(!surface.process_file(file));
        }
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn image_payload_decodes_to_original_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let received = RefCell::new(Vec::new());
        let mut surface = UploadSurface::new(|payload: ImagePayload| {
            received.borrow_mut().push(payload)
        });

        assert!(surface.process_file(SourceFile::from_memory("photo.png", "image/png", bytes.clone())));

        let received = received.into_inner();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].media_type(), "image/png");
        assert_eq!(received[0].decode().unwrap(), bytes);
    }

    #[test]
    fn only_first_dropped_file_is_used() {
        let received = RefCell::new(Vec::new());
        let mut surface = UploadSurface::new(|payload: ImagePayload| {
            received.borrow_mut().push(payload)
        });

        surface.drop_files(vec![
            SourceFile::from_memory("a.jpg", "image/jpeg", vec![1]),
            SourceFile::from_memory("b.jpg", "image/jpeg", vec![2]),
        ]);
        assert!(!surface.drop_files(Vec::new()));

        let received = received.into_inner();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].decode().unwrap(), vec![1]);
    }

    #[test]
    fn blank_media_type_is_guessed_from_name() {
        let file = SourceFile::from_memory("scan.webp", "", vec![0]);
        assert_eq!(file.media_type, "image/webp");
        assert!(file.is_image());
    }

    #[test]
    fn reads_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grandma.jpg");
        fs::write(&path, b"\xff\xd8\xff fake jpeg").unwrap();

        let mut seen = None;
        let mut surface = UploadSurface::new(|payload: ImagePayload| seen = Some(payload));
        assert!(surface.select_path(&path).unwrap());
        drop(surface);

        let payload = seen.expect("callback fired");
        assert_eq!(payload.media_type(), "image/jpeg");
        assert_eq!(payload.decode().unwrap(), b"\xff\xd8\xff fake jpeg");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let mut surface = UploadSurface::new(|_| {});
        let err = surface
            .select_path(Path::new("/definitely/not/here.png"))
            .unwrap_err();
        assert!(matches!(err, UploadError::Read { .. }));
    }
}
