//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into a unified `InputEvent` in
//! surface coordinates, so drag logic never sees which device produced
//! the pointer.

use card_core::{Point, Size};

/// One pointer position in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerSample {
    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }

    /// The first active touch point; `None` when the list is empty
    /// (e.g. a `touchend` that lifted the last finger).
    pub fn first_touch(touches: &[(f64, f64)]) -> Option<Self> {
        touches
            .first()
            .map(|&(client_x, client_y)| Self { client_x, client_y })
    }
}

/// On-screen box of the surface element, as reported by
/// `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    /// Map a client-space sample into surface pixels.
    ///
    /// Scales by `surface / box` so a canvas shown at a different CSS size
    /// still hits what is under the pointer. A collapsed box maps 1:1.
    pub fn to_surface(&self, sample: &PointerSample, surface: Size) -> Point {
        let sx = if self.width > 0.0 { surface.width / self.width } else { 1.0 };
        let sy = if self.height > 0.0 { surface.height / self.height } else { 1.0 };
        Point::new(
            (sample.client_x - self.left) * sx,
            (sample.client_y - self.top) * sy,
        )
    }
}

/// A normalized input event, positions in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse down, touch start.
    PointerDown { x: f64, y: f64 },

    /// Mouse move, touch move.
    PointerMove { x: f64, y: f64 },

    /// Mouse up, touch end.
    PointerUp,

    /// Pointer left the surface.
    PointerLeave,
}

impl InputEvent {
    pub fn pointer_down(sample: &PointerSample, rect: &ClientRect, surface: Size) -> Self {
        let p = rect.to_surface(sample, surface);
        Self::PointerDown { x: p.x, y: p.y }
    }

    pub fn pointer_move(sample: &PointerSample, rect: &ClientRect, surface: Size) -> Self {
        let p = rect.to_surface(sample, surface);
        Self::PointerMove { x: p.x, y: p.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SURFACE: Size = Size::new(630.0, 800.0);

    /// Canvas at the page origin, shown at its natural size.
    fn natural(surface: Size) -> ClientRect {
        ClientRect {
            left: 0.0,
            top: 0.0,
            width: surface.width,
            height: surface.height,
        }
    }

    #[test]
    fn offsets_by_element_box() {
        let rect = ClientRect {
            left: 100.0,
            top: 50.0,
            width: 630.0,
            height: 800.0,
        };
        let p = rect.to_surface(&PointerSample::mouse(415.0, 450.0), SURFACE);
        assert_eq!(p, Point::new(315.0, 400.0));
    }

    #[test]
    fn scales_when_displayed_smaller() {
        let rect = ClientRect {
            left: 0.0,
            top: 0.0,
            width: 315.0,
            height: 400.0,
        };
        let p = rect.to_surface(&PointerSample::mouse(100.0, 100.0), SURFACE);
        assert_eq!(p, Point::new(200.0, 200.0));
    }

    #[test]
    fn zero_client_coordinate_is_a_real_position() {
        // x = 0 is a valid mouse position, not "absent".
        let e = InputEvent::pointer_down(
            &PointerSample::mouse(0.0, 12.0),
            &natural(SURFACE),
            SURFACE,
        );
        assert_eq!(e, InputEvent::PointerDown { x: 0.0, y: 12.0 });
    }

    #[test]
    fn first_touch_only() {
        let s = PointerSample::first_touch(&[(10.0, 20.0), (30.0, 40.0)]).unwrap();
        assert_eq!((s.client_x, s.client_y), (10.0, 20.0));
        assert_eq!(PointerSample::first_touch(&[]), None);
    }

    #[test]
    fn mouse_and_touch_map_identically() {
        let rect = natural(SURFACE);
        let mouse = InputEvent::pointer_move(&PointerSample::mouse(5.0, 6.0), &rect, SURFACE);
        let touch = PointerSample::first_touch(&[(5.0, 6.0)])
            .map(|s| InputEvent::pointer_move(&s, &rect, SURFACE));
        assert_eq!(Some(mouse), touch);
        assert_eq!(mouse, InputEvent::PointerMove { x: 5.0, y: 6.0 });
    }
}
