//! Card data model: the photo layer, text labels, and drag session.
//!
//! Positions are in surface pixels with the origin at the top-left corner.

use kurbo::{Point, Rect, RoundedRect, Size, Vec2};
use serde::{Deserialize, Serialize};

// ─── Text labels ─────────────────────────────────────────────────────────

/// A draggable text overlay.
///
/// `(x, y)` is the anchor: text is centered horizontally on `x` and its
/// bottom edge sits on `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub content: String,
    pub x: f64,
    pub y: f64,
}

impl TextLabel {
    pub fn new(content: impl Into<String>, anchor: Point) -> Self {
        Self {
            content: content.into(),
            x: anchor.x,
            y: anchor.y,
        }
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_anchor(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    /// Hit box for a label whose rendered width is `width`.
    ///
    /// Centered on the anchor on both axes, `line_height` tall.
    pub fn hit_bounds(&self, width: f64, line_height: f64) -> Rect {
        Rect::new(
            self.x - width / 2.0,
            self.y - line_height / 2.0,
            self.x + width / 2.0,
            self.y + line_height / 2.0,
        )
    }
}

// ─── Photo layer ─────────────────────────────────────────────────────────

/// The single uploaded photo, drawn at `size` regardless of the source
/// resolution.
#[derive(Debug, Clone)]
pub struct PhotoLayer<I> {
    pub image: I,
    pub position: Point,
    pub size: Size,
}

impl<I> PhotoLayer<I> {
    /// Place `image` at the center of a `surface`-sized canvas.
    pub fn centered(image: I, surface: Size, size: Size) -> Self {
        Self {
            image,
            position: centered_origin(surface, size),
            size,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Rounded clip path; the radius is clamped to half the shorter side.
    pub fn clip_shape(&self, corner_radius: f64) -> RoundedRect {
        let r = corner_radius
            .min(self.size.width / 2.0)
            .min(self.size.height / 2.0)
            .max(0.0);
        self.bounds().to_rounded_rect(r)
    }
}

/// Top-left corner that centers `size` inside `surface`.
pub fn centered_origin(surface: Size, size: Size) -> Point {
    Point::new(
        (surface.width - size.width) / 2.0,
        (surface.height - size.height) / 2.0,
    )
}

/// Closed-interval containment; kurbo's `Rect::contains` is half-open,
/// which would miss presses on the right and bottom edges.
pub fn contains_inclusive(rect: &Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

// ─── Drag session ────────────────────────────────────────────────────────

/// What a press grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum DragTarget {
    Photo,
    /// Index into the label sequence.
    Label(usize),
}

/// Live only between a press and its release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub target: DragTarget,
    /// Pointer position minus the target's origin at press time.
    pub offset: Vec2,
}

impl DragSession {
    pub fn new(target: DragTarget, pointer: Point, origin: Point) -> Self {
        Self {
            target,
            offset: pointer - origin,
        }
    }

    /// Where the target's origin goes when the pointer is at `pointer`.
    pub fn origin_for(&self, pointer: Point) -> Point {
        pointer - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SURFACE: Size = Size::new(630.0, 800.0);
    const PHOTO: Size = Size::new(335.0, 420.0);

    #[test]
    fn photo_centers_on_surface() {
        let layer = PhotoLayer::centered((), SURFACE, PHOTO);
        assert_eq!(layer.position, Point::new(147.5, 190.0));
        assert_eq!(layer.bounds(), Rect::new(147.5, 190.0, 482.5, 610.0));
    }

    #[test]
    fn clip_radius_is_clamped() {
        let layer = PhotoLayer::centered((), SURFACE, Size::new(40.0, 20.0));
        let clip = layer.clip_shape(33.0);
        assert_eq!(clip.radii().top_left, 10.0);

        let clip = PhotoLayer::centered((), SURFACE, PHOTO).clip_shape(33.0);
        assert_eq!(clip.radii().bottom_right, 33.0);
    }

    #[test]
    fn inclusive_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(contains_inclusive(&r, Point::new(10.0, 10.0)));
        assert!(contains_inclusive(&r, Point::new(0.0, 0.0)));
        assert!(!contains_inclusive(&r, Point::new(10.01, 5.0)));
    }

    #[test]
    fn label_hit_bounds_center_on_anchor() {
        let label = TextLabel::new("Hi", Point::new(315.0, 400.0));
        let b = label.hit_bounds(40.0, 35.0);
        assert_eq!(b, Rect::new(295.0, 382.5, 335.0, 417.5));
    }

    #[test]
    fn drag_session_preserves_offset() {
        let s = DragSession::new(
            DragTarget::Photo,
            Point::new(200.0, 250.0),
            Point::new(147.5, 190.0),
        );
        assert_eq!(s.offset, Vec2::new(52.5, 60.0));
        assert_eq!(s.origin_for(Point::new(300.0, 300.0)), Point::new(247.5, 240.0));
    }
}
