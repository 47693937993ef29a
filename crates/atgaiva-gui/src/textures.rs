//! GPU textures for the original and restored photos

use atgaiva_core::{ImagePayload, PayloadError, SessionState};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("image could not be decoded: {0}")]
    Image(#[from] image::ImageError),
}

/// Decode a payload into pixels egui can upload.
pub fn decode_color_image(payload: &ImagePayload) -> Result<egui::ColorImage, TextureError> {
    let bytes = payload.decode()?;
    let decoded = image::load_from_memory(&bytes)?;
    let size = [decoded.width() as usize, decoded.height() as usize];
    let rgba = decoded.to_rgba8();
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        rgba.as_flat_samples().as_slice(),
    ))
}

/// Textures for whatever the session currently shows.
///
/// Reloaded only when [`SessionTextures::invalidate`] was called, since
/// comparing payloads every frame would touch megabytes of base64.
#[derive(Default)]
pub struct SessionTextures {
    pub original: Option<egui::TextureHandle>,
    pub restored: Option<egui::TextureHandle>,
    dirty: bool,
}

impl SessionTextures {
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Reload textures if the session changed. Returns decode failures for the log.
    pub fn sync(&mut self, ctx: &egui::Context, state: &SessionState) -> Vec<String> {
        if !self.dirty {
            return Vec::new();
        }
        self.dirty = false;

        let mut problems = Vec::new();
        self.original = load(ctx, "original", state.original(), &mut problems);
        self.restored = load(ctx, "restored", state.restored(), &mut problems);
        problems
    }
}

fn load(
    ctx: &egui::Context,
    name: &str,
    payload: Option<&ImagePayload>,
    problems: &mut Vec<String>,
) -> Option<egui::TextureHandle> {
    let payload = payload?;
    match decode_color_image(payload) {
        Ok(image) => Some(ctx.load_texture(name, image, egui::TextureOptions::LINEAR)),
        Err(err) => {
            warn!(texture = name, error = %err, "Preview could not be decoded");
            problems.push(format!("Preview of the {name} image unavailable: {err}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_payload() -> ImagePayload {
        let mut pixels = image::RgbaImage::new(3, 2);
        pixels.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(pixels)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        ImagePayload::from_bytes("image/png", &bytes)
    }

    #[test]
    fn decodes_png_payload() {
        let image = decode_color_image(&png_payload()).unwrap();
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn garbage_is_an_image_error() {
        let payload = ImagePayload::from_bytes("image/png", b"not really a png");
        assert!(matches!(
            decode_color_image(&payload),
            Err(TextureError::Image(_))
        ));
    }

    #[test]
    fn sync_loads_only_after_invalidate() {
        let ctx = egui::Context::default();
        let state = SessionState::HasImage {
            original: png_payload(),
        };
        let mut textures = SessionTextures::default();

        assert!(textures.sync(&ctx, &state).is_empty());
        assert!(textures.original.is_none());

        textures.invalidate();
        assert!(textures.sync(&ctx, &state).is_empty());
        assert!(textures.original.is_some());
        assert!(textures.restored.is_none());
    }
}
