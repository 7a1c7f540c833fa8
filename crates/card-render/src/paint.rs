//! Card state → surface drawing calls.
//!
//! Every call repaints the whole surface: clear, background, clipped
//! photo, then labels in sequence order (later labels on top).

use crate::surface::Surface;
use card_core::{PhotoLayer, TextLabel, TextStyle};

/// Borrowed view of everything that ends up on the surface.
pub struct CardScene<'a, I> {
    pub background: Option<&'a I>,
    pub photo: Option<&'a PhotoLayer<I>>,
    pub labels: &'a [TextLabel],
    pub corner_radius: f64,
    pub text_style: &'a TextStyle,
}

/// Paint the full card. Call after every state change.
pub fn paint_card<S: Surface>(surface: &mut S, scene: &CardScene<'_, S::Image>) {
    surface.clear();

    if let Some(background) = scene.background {
        let full = surface.bounds();
        surface.draw_image(background, full);
    }

    if let Some(photo) = scene.photo {
        let clip = photo.clip_shape(scene.corner_radius);
        surface.draw_image_clipped(&photo.image, photo.bounds(), &clip);
    }

    for label in scene.labels {
        log::trace!("LABEL {:?} at ({}, {})", label.content, label.x, label.y);
        surface.fill_text(&label.content, label.anchor(), scene.text_style);
    }
}
