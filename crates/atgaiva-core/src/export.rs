//! Exporting the restored image: decode, then share or save.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::payload::{ImagePayload, PayloadError};

/// File name every export is offered under.
pub const RESULT_FILE_NAME: &str = "restauruota-nuotrauka.png";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("restored image could not be decoded: {0}")]
    Decode(#[from] PayloadError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sharing is not available on this platform")]
    ShareUnavailable,
    #[error("share failed: {0}")]
    Share(String),
    #[error("export cancelled")]
    Cancelled,
}

/// Decoded bytes ready to leave the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn from_payload(payload: &ImagePayload) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: RESULT_FILE_NAME.to_string(),
            media_type: payload.media_type().to_string(),
            bytes: payload.decode()?,
        })
    }
}

/// Coarse device classification used to prefer sharing over saving.
///
/// This is a best-effort user-agent heuristic, not a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)Android|iPhone|iPad|iPod").expect("mobile user agent pattern is valid")
    })
}

impl DeviceClass {
    pub fn from_user_agent(user_agent: &str) -> Self {
        if mobile_pattern().is_match(user_agent) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Classification of the machine we are running on.
    pub fn current() -> Self {
        Self::from_user_agent(&host_user_agent())
    }
}

/// User-agent style description of the host, e.g. `atgaiva/0.1.0 (linux; x86_64)`.
pub fn host_user_agent() -> String {
    let os = match std::env::consts::OS {
        "ios" => "iPhone",
        "android" => "Android",
        other => other,
    };
    format!(
        "atgaiva/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        os,
        std::env::consts::ARCH
    )
}

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Shared,
    Saved(PathBuf),
}

/// Destination for exported images.
pub trait ExportSink {
    /// Whether [`ExportSink::share`] can work at all.
    fn supports_share(&self) -> bool {
        false
    }

    fn share(&mut self, _artifact: &ExportArtifact) -> Result<(), ExportError> {
        Err(ExportError::ShareUnavailable)
    }

    fn save(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError>;
}

/// Decode `payload` and hand it to `sink`, sharing on mobile when possible.
///
/// A failed share falls back to a plain save.
pub fn export_result(
    payload: &ImagePayload,
    device: DeviceClass,
    sink: &mut dyn ExportSink,
) -> Result<ExportOutcome, ExportError> {
    let artifact = ExportArtifact::from_payload(payload)?;

    if device == DeviceClass::Mobile && sink.supports_share() {
        match sink.share(&artifact) {
            Ok(()) => {
                info!(file = %artifact.file_name, "Restored image shared");
                return Ok(ExportOutcome::Shared);
            }
            Err(err) => {
                warn!(error = %err, "Share failed, using fallback download");
            }
        }
    }

    let path = sink.save(&artifact)?;
    info!(path = %path.display(), bytes = artifact.bytes.len(), "Restored image saved");
    Ok(ExportOutcome::Saved(path))
}

/// Saves into a directory without overwriting existing files.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ExportSink for DirectorySink {
    fn save(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.directory).map_err(|source| ExportError::Write {
            path: self.directory.clone(),
            source,
        })?;
        let path = unique_path(&self.directory, &artifact.file_name);
        write_artifact(&path, artifact)?;
        Ok(path)
    }
}

/// Saves to one exact path, replacing whatever is there.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for FileSink {
    fn save(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ExportError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        write_artifact(&self.path, artifact)?;
        Ok(self.path.clone())
    }
}

pub fn write_artifact(path: &Path, artifact: &ExportArtifact) -> Result<(), ExportError> {
    fs::write(path, &artifact.bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// `dir/name`, or `dir/stem (n).ext` with the first free `n`.
pub fn unique_path(directory: &Path, file_name: &str) -> PathBuf {
    let candidate = directory.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let extension = name.extension().map(|e| e.to_string_lossy().into_owned());

    (1u32..)
        .map(|n| match &extension {
            Some(ext) => directory.join(format!("{stem} ({n}).{ext}")),
            None => directory.join(format!("{stem} ({n})")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        share_supported: bool,
        share_fails: bool,
        shared: Vec<ExportArtifact>,
        saved: Vec<ExportArtifact>,
    }

    impl ExportSink for RecordingSink {
        fn supports_share(&self) -> bool {
            self.share_supported
        }

        fn share(&mut self, artifact: &ExportArtifact) -> Result<(), ExportError> {
            if self.share_fails {
                return Err(ExportError::Share("user dismissed".into()));
            }
            self.shared.push(artifact.clone());
            Ok(())
        }

        fn save(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
            self.saved.push(artifact.clone());
            Ok(PathBuf::from(&artifact.file_name))
        }
    }

    fn payload() -> ImagePayload {
        ImagePayload::from_bytes("image/png", b"restored pixels")
    }

    #[test]
    fn classifies_user_agents() {
        for ua in [
            "Mozilla/5.0 (Linux; Android 14; Pixel 8)",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X)",
            "something ipod something",
        ] {
            assert_eq!(DeviceClass::from_user_agent(ua), DeviceClass::Mobile, "{ua}");
        }
        assert_eq!(
            DeviceClass::from_user_agent("Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0"),
            DeviceClass::Desktop
        );
    }

    #[test]
    fn desktop_saves_directly() {
        let mut sink = RecordingSink {
            share_supported: true,
            ..Default::default()
        };
        let outcome = export_result(&payload(), DeviceClass::Desktop, &mut sink).unwrap();
        assert_eq!(outcome, ExportOutcome::Saved(PathBuf::from(RESULT_FILE_NAME)));
        assert!(sink.shared.is_empty());
        assert_eq!(sink.saved[0].bytes, b"restored pixels");
        assert_eq!(sink.saved[0].media_type, "image/png");
    }

    #[test]
    fn mobile_prefers_share() {
        let mut sink = RecordingSink {
            share_supported: true,
            ..Default::default()
        };
        let outcome = export_result(&payload(), DeviceClass::Mobile, &mut sink).unwrap();
        assert_eq!(outcome, ExportOutcome::Shared);
        assert!(sink.saved.is_empty());
    }

    #[test]
    fn failed_share_falls_back_to_save() {
        let mut sink = RecordingSink {
            share_supported: true,
            share_fails: true,
            ..Default::default()
        };
        let outcome = export_result(&payload(), DeviceClass::Mobile, &mut sink).unwrap();
        assert!(matches!(outcome, ExportOutcome::Saved(_)));
        assert_eq!(sink.saved.len(), 1);
    }

    #[test]
    fn mobile_without_share_support_saves() {
        let mut sink = RecordingSink::default();
        export_result(&payload(), DeviceClass::Mobile, &mut sink).unwrap();
        assert_eq!(sink.saved.len(), 1);
    }

    #[test]
    fn undecodable_payload_is_an_error() {
        let broken = ImagePayload::parse("data:image/png;base64,***").unwrap();
        let mut sink = RecordingSink::default();
        let err = export_result(&broken, DeviceClass::Desktop, &mut sink).unwrap_err();
        assert!(matches!(err, ExportError::Decode(_)));
        assert!(sink.saved.is_empty());
    }

    #[test]
    fn directory_sink_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());

        let first = export_result(&payload(), DeviceClass::Desktop, &mut sink).unwrap();
        let second = export_result(&payload(), DeviceClass::Desktop, &mut sink).unwrap();

        assert_eq!(first, ExportOutcome::Saved(dir.path().join(RESULT_FILE_NAME)));
        assert_eq!(
            second,
            ExportOutcome::Saved(dir.path().join("restauruota-nuotrauka (1).png"))
        );
        assert_eq!(
            fs::read(dir.path().join("restauruota-nuotrauka (1).png")).unwrap(),
            b"restored pixels"
        );
    }

    #[test]
    fn file_sink_writes_exact_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("out.png");
        let mut sink = FileSink::new(&target);
        let outcome = export_result(&payload(), DeviceClass::Desktop, &mut sink).unwrap();
        assert_eq!(outcome, ExportOutcome::Saved(target.clone()));
        assert_eq!(fs::read(target).unwrap(), b"restored pixels");
    }
}
