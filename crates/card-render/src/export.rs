//! PNG export with the blank-surface guard.

use crate::surface::{Surface, SurfaceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Every channel of every pixel is zero: nothing has been drawn.
    #[error("no image available to download")]
    BlankSurface,

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// `true` when every byte is zero.
///
/// This is a "never painted" check, not a content check: a surface
/// painted with opaque black still has non-zero alpha and passes.
pub fn is_blank(pixels: &[u8]) -> bool {
    pixels.iter().all(|&v| v == 0)
}

/// Read the surface back and encode it, refusing blank surfaces.
pub fn export_png<S: Surface>(surface: &S) -> Result<S::Png, ExportError> {
    let pixels = surface.read_pixels()?;
    if is_blank(&pixels) {
        log::debug!("export refused: surface is blank");
        return Err(ExportError::BlankSurface);
    }
    let png = surface.encode_png()?;
    log::debug!("exported {} bytes of pixels", pixels.len());
    Ok(png)
}
