//! Hit testing: point → drag target.
//!
//! The photo is tested first. When it misses, every label is tested in
//! sequence order and the last one containing the point wins, so the
//! label painted on top is the one that gets grabbed.

use crate::paint::CardScene;
use crate::surface::Surface;
use card_core::{DragTarget, PhotoLayer, Point, TextLabel, TextStyle, contains_inclusive};

/// Find what a press at `p` grabs. `None` means empty background.
pub fn hit_test<S: Surface>(
    surface: &S,
    scene: &CardScene<'_, S::Image>,
    p: Point,
) -> Option<DragTarget> {
    if let Some(photo) = scene.photo
        && hit_test_photo(photo, p)
    {
        return Some(DragTarget::Photo);
    }
    hit_test_labels(scene.labels, scene.text_style, p, |text| {
        surface.measure_text(text, scene.text_style)
    })
    .map(DragTarget::Label)
}

pub fn hit_test_photo<I>(photo: &PhotoLayer<I>, p: Point) -> bool {
    contains_inclusive(&photo.bounds(), p)
}

/// Index of the last label whose hit box contains `p`.
pub fn hit_test_labels(
    labels: &[TextLabel],
    style: &TextStyle,
    p: Point,
    measure: impl Fn(&str) -> f64,
) -> Option<usize> {
    let mut hit = None;
    for (index, label) in labels.iter().enumerate() {
        let width = measure(&label.content);
        if contains_inclusive(&label.hit_bounds(width, style.line_height), p) {
            hit = Some(index);
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_core::{CardConfig, Size};
    use pretty_assertions::assert_eq;

    fn measure(text: &str) -> f64 {
        text.chars().count() as f64 * 20.0
    }

    #[test]
    fn last_overlapping_label_wins() {
        let style = CardConfig::default().text_style();
        let labels = vec![
            TextLabel::new("first", Point::new(315.0, 400.0)),
            TextLabel::new("second", Point::new(315.0, 400.0)),
            TextLabel::new("far", Point::new(50.0, 50.0)),
        ];
        assert_eq!(
            hit_test_labels(&labels, &style, Point::new(315.0, 400.0), measure),
            Some(1)
        );
        assert_eq!(
            hit_test_labels(&labels, &style, Point::new(50.0, 60.0), measure),
            Some(2)
        );
        assert_eq!(
            hit_test_labels(&labels, &style, Point::new(600.0, 700.0), measure),
            None
        );
    }

    #[test]
    fn label_box_is_line_height_tall_around_anchor() {
        let style = CardConfig::default().text_style();
        // 2 chars * 20 = 40 wide → x in [295, 335], y in [382.5, 417.5]
        let labels = vec![TextLabel::new("Hi", Point::new(315.0, 400.0))];
        let at = |x, y| hit_test_labels(&labels, &style, Point::new(x, y), measure);
        assert_eq!(at(295.0, 382.5), Some(0));
        assert_eq!(at(335.0, 417.5), Some(0));
        assert_eq!(at(336.0, 400.0), None);
        assert_eq!(at(315.0, 381.0), None);
    }

    #[test]
    fn photo_edges_are_inclusive() {
        let photo = PhotoLayer::centered((), Size::new(630.0, 800.0), Size::new(335.0, 420.0));
        assert!(hit_test_photo(&photo, Point::new(147.5, 190.0)));
        assert!(hit_test_photo(&photo, Point::new(482.5, 610.0)));
        assert!(!hit_test_photo(&photo, Point::new(147.0, 300.0)));
    }
}
