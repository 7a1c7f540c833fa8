//! Integration tests: card scene → PixmapSurface → pixels / PNG.
//!
//! Exercises `paint_card`, `hit_test`, and `export_png` together against the
//! native software surface at the default card size.

use card_core::{CardConfig, DragTarget, PhotoLayer, Point, TextLabel};
use card_render::{CardScene, ExportError, PixmapSurface, Surface, export_png, hit_test, paint_card};
use pretty_assertions::assert_eq;
use tiny_skia::{Color, Pixmap};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn solid(rgba: [u8; 4]) -> Pixmap {
    let mut p = Pixmap::new(8, 8).expect("pixmap");
    p.fill(Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]));
    p
}

fn pixel(surface: &PixmapSurface, x: u32, y: u32) -> [u8; 4] {
    let c = surface
        .pixmap()
        .pixel(x, y)
        .expect("in bounds")
        .demultiply();
    [c.red(), c.green(), c.blue(), c.alpha()]
}

fn card_surface(config: &CardConfig) -> PixmapSurface {
    PixmapSurface::new(config.surface_width, config.surface_height).expect("surface")
}

// ─── Compositing ─────────────────────────────────────────────────────────

#[test]
fn photo_is_clipped_over_stretched_background() {
    init_logging();
    let config = CardConfig::default();
    let style = config.text_style();
    let background = solid([255, 0, 0, 255]);
    let photo = PhotoLayer::centered(
        solid([0, 0, 255, 255]),
        config.surface_size(),
        config.photo_size(),
    );
    let scene = CardScene {
        background: Some(&background),
        photo: Some(&photo),
        labels: &[],
        corner_radius: config.corner_radius,
        text_style: &style,
    };

    let mut surface = card_surface(&config);
    paint_card(&mut surface, &scene);

    // Background reaches every corner of the surface.
    assert_eq!(pixel(&surface, 0, 0), [255, 0, 0, 255]);
    assert_eq!(pixel(&surface, 629, 799), [255, 0, 0, 255]);
    // Photo center.
    assert_eq!(pixel(&surface, 315, 400), [0, 0, 255, 255]);
    // Photo's top-left corner pixel is outside the rounded clip.
    assert_eq!(pixel(&surface, 148, 190), [255, 0, 0, 255]);
    // Just inside the straight top edge, away from the corners.
    assert_eq!(pixel(&surface, 315, 192), [0, 0, 255, 255]);
}

#[test]
fn repaint_starts_from_scratch() {
    init_logging();
    let config = CardConfig::default();
    let style = config.text_style();
    let background = solid([0, 255, 0, 255]);
    let mut surface = card_surface(&config);

    let with_bg = CardScene {
        background: Some(&background),
        photo: None,
        labels: &[],
        corner_radius: config.corner_radius,
        text_style: &style,
    };
    paint_card(&mut surface, &with_bg);
    assert_eq!(pixel(&surface, 10, 10), [0, 255, 0, 255]);

    let without_bg: CardScene<'_, Pixmap> = CardScene {
        background: None,
        ..with_bg
    };
    paint_card(&mut surface, &without_bg);
    assert_eq!(pixel(&surface, 10, 10), [0, 0, 0, 0]);
}

// ─── Hit testing through the surface ─────────────────────────────────────

#[test]
fn photo_wins_over_labels_beneath_it() {
    let config = CardConfig::default();
    let style = config.text_style();
    let surface = card_surface(&config);
    let photo = PhotoLayer::centered(solid([0, 0, 0, 255]), config.surface_size(), config.photo_size());
    let labels = vec![TextLabel::new("Hello", Point::new(315.0, 400.0))];
    let scene = CardScene {
        background: None,
        photo: Some(&photo),
        labels: &labels,
        corner_radius: config.corner_radius,
        text_style: &style,
    };
    assert_eq!(hit_test(&surface, &scene, Point::new(315.0, 400.0)), Some(DragTarget::Photo));

    let no_photo = CardScene { photo: None, ..scene };
    assert_eq!(
        hit_test(&surface, &no_photo, Point::new(315.0, 400.0)),
        Some(DragTarget::Label(0))
    );
    assert_eq!(hit_test(&surface, &no_photo, Point::new(5.0, 5.0)), None);
}

// ─── Export ──────────────────────────────────────────────────────────────

#[test]
fn fresh_surface_refuses_export() {
    let surface = card_surface(&CardConfig::default());
    assert!(matches!(export_png(&surface), Err(ExportError::BlankSurface)));
}

#[test]
fn painted_surface_exports_png() {
    init_logging();
    let config = CardConfig::default();
    let style = config.text_style();
    let background = solid([10, 20, 30, 255]);
    let scene = CardScene {
        background: Some(&background),
        photo: None,
        labels: &[],
        corner_radius: config.corner_radius,
        text_style: &style,
    };
    let mut surface = card_surface(&config);
    paint_card(&mut surface, &scene);

    let png = export_png(&surface).expect("export");
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));

    let decoded = PixmapSurface::decode_image(&png).expect("decode");
    assert_eq!((decoded.width(), decoded.height()), (630, 800));
}

// ─── Labels ──────────────────────────────────────────────────────────────

const FONT: &[u8] = include_bytes!("fixtures/DejaVuSans-Bold.ttf");

fn labels_only_scene<'a>(
    labels: &'a [TextLabel],
    style: &'a card_core::TextStyle,
) -> CardScene<'a, Pixmap> {
    CardScene {
        background: None,
        photo: None,
        labels,
        corner_radius: 33.0,
        text_style: style,
    }
}

#[test]
fn label_only_card_exports_png() {
    init_logging();
    let config = CardConfig::default();
    let style = config.text_style();
    let labels = vec![TextLabel::new("Hello", Point::new(315.0, 400.0))];
    let mut surface = card_surface(&config)
        .with_font(FONT.to_vec())
        .expect("font");
    paint_card(&mut surface, &labels_only_scene(&labels, &style));

    // White ink just above the anchor, nothing below it.
    let above = (360..400).any(|y| pixel(&surface, 315, y)[3] > 0)
        || (280..350).any(|x| pixel(&surface, x, 385)[3] > 0);
    assert!(above);
    assert!((400..440).all(|y| pixel(&surface, 315, y)[3] == 0));

    let png = export_png(&surface).expect("export");
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn labels_without_font_leave_surface_blank() {
    init_logging();
    let config = CardConfig::default();
    let style = config.text_style();
    let labels = vec![TextLabel::new("Hello", Point::new(315.0, 400.0))];
    let mut surface = card_surface(&config);
    paint_card(&mut surface, &labels_only_scene(&labels, &style));
    assert!(matches!(export_png(&surface), Err(ExportError::BlankSurface)));
}
