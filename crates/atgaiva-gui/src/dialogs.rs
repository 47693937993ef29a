//! File dialogs and native alerts

use std::path::{Path, PathBuf};

use atgaiva_core::export::write_artifact;
use atgaiva_core::{ACCEPTED_EXTENSIONS, ExportArtifact, ExportError, ExportSink};

/// Open a file picker dialog
pub fn pick_file(title: &str, filter_name: &str, extensions: &[&str]) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter(filter_name, extensions)
        .pick_file()
}

/// Pick a photo to restore
pub fn pick_photo(title: &str) -> Option<PathBuf> {
    pick_file(title, "Images", ACCEPTED_EXTENSIONS)
}

/// Blocking error message, the desktop counterpart of `alert()`.
pub fn alert(title: &str, message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// Best default folder for downloads on this machine.
pub fn default_download_directory() -> Option<PathBuf> {
    directories::UserDirs::new().and_then(|dirs| {
        dirs.download_dir()
            .or_else(|| dirs.picture_dir())
            .map(Path::to_path_buf)
    })
}

/// Asks the user where to save, then writes the file there.
pub struct SaveDialogSink {
    title: String,
    directory: Option<PathBuf>,
}

impl SaveDialogSink {
    pub fn new(title: impl Into<String>, directory: Option<PathBuf>) -> Self {
        Self {
            title: title.into(),
            directory,
        }
    }
}

impl ExportSink for SaveDialogSink {
    fn save(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
        let mut dialog = rfd::FileDialog::new()
            .set_title(&self.title)
            .set_file_name(&artifact.file_name)
            .add_filter("PNG", &["png"]);
        if let Some(dir) = self.directory.as_ref() {
            dialog = dialog.set_directory(dir);
        }

        let path = dialog.save_file().ok_or(ExportError::Cancelled)?;
        write_artifact(&path, artifact)?;
        Ok(path)
    }
}
