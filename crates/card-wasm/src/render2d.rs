//! Canvas2D surface.
//!
//! Implements `Surface` on an HTML `<canvas>` through
//! `CanvasRenderingContext2d`. Drawing failures are logged and skipped,
//! which is what the canvas itself does with an undecoded image.

use crate::assets::WebImage;
use card_core::{Point, Rect, RoundedRect, Size, TextStyle};
use card_render::{Surface, SurfaceError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    /// Size `canvas` to `width` × `height` pixels and grab its 2D context.
    pub fn new(canvas: HtmlCanvasElement, width: u32, height: u32) -> Result<Self, JsValue> {
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn draw_element(&self, image: &WebImage, dest: Rect) {
        let result = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image.element(),
            dest.x0,
            dest.y0,
            dest.width(),
            dest.height(),
        );
        if let Err(e) = result {
            log::warn!("drawImage failed: {e:?}");
        }
    }
}

impl Surface for Canvas2dSurface {
    type Image = WebImage;
    /// `data:image/png;base64,...`
    type Png = String;

    fn size(&self) -> Size {
        Size::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
    }

    fn draw_image(&mut self, image: &WebImage, dest: Rect) {
        self.draw_element(image, dest);
    }

    fn draw_image_clipped(&mut self, image: &WebImage, dest: Rect, clip: &RoundedRect) {
        let r = clip.rect();
        self.ctx.save();
        rounded_rect_path(
            &self.ctx,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            clip.radii().top_left,
        );
        self.ctx.clip();
        self.draw_element(image, dest);
        self.ctx.restore();
    }

    fn fill_text(&mut self, text: &str, anchor: Point, style: &TextStyle) {
        self.ctx.set_font(&style.css_font());
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("bottom");
        self.ctx.set_fill_style_str(&style.color);
        if let Err(e) = self.ctx.fill_text(text, anchor.x, anchor.y) {
            log::warn!("fillText failed: {e:?}");
        }
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> f64 {
        // Set explicitly: the context font is whatever the last draw left behind.
        self.ctx.set_font(&style.css_font());
        match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(e) => {
                log::warn!("measureText failed: {e:?}");
                0.0
            }
        }
    }

    fn read_pixels(&self) -> Result<Vec<u8>, SurfaceError> {
        let size = self.size();
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, size.width, size.height)
            .map_err(|e| SurfaceError::ReadBack(format!("{e:?}")))?;
        Ok(data.data().0)
    }

    fn encode_png(&self) -> Result<String, SurfaceError> {
        self.canvas
            .to_data_url_with_type("image/png")
            .map_err(|e| SurfaceError::Encode(format!("{e:?}")))
    }
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}
