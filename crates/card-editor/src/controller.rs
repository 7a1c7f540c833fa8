//! The card session controller.
//!
//! `CardController` owns everything the session knows: the surface, the
//! optional photo, the background, the label sequence, and the drag
//! session. Event handlers mutate it and repaint; nothing lives in
//! globals.
//!
//! Asset loads are two-step. The host calls `begin_*_load` when the user
//! picks something, decodes asynchronously, then calls `finish_*_load`
//! with the ticket. A decode that never succeeds simply never finishes,
//! which leaves the card as it was.

use crate::input::InputEvent;
use crate::loader::{LoadSlot, LoadTicket};
use card_core::{
    BackgroundChoice, CardConfig, DragSession, DragTarget, PhotoLayer, Point, Size, TextLabel,
    TextStyle,
};
use card_render::{CardScene, ExportError, Surface, export_png, hit_test, paint_card};

pub struct CardController<S: Surface> {
    config: CardConfig,
    text_style: TextStyle,
    surface: S,
    photo: Option<PhotoLayer<S::Image>>,
    photo_load: LoadSlot,
    background: Option<S::Image>,
    background_choice: Option<BackgroundChoice>,
    background_load: LoadSlot,
    labels: Vec<TextLabel>,
    drag: Option<DragSession>,
}

impl<S: Surface> CardController<S> {
    /// Take ownership of `surface`. Nothing is painted until the first
    /// state change, so a fresh surface stays blank.
    pub fn new(config: CardConfig, surface: S) -> Self {
        let text_style = config.text_style();
        Self {
            config,
            text_style,
            surface,
            photo: None,
            photo_load: LoadSlot::default(),
            background: None,
            background_choice: None,
            background_load: LoadSlot::default(),
            labels: Vec::new(),
            drag: None,
        }
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Repaint the whole card.
    pub fn render(&mut self) {
        let scene = CardScene {
            background: self.background.as_ref(),
            photo: self.photo.as_ref(),
            labels: &self.labels,
            corner_radius: self.config.corner_radius,
            text_style: &self.text_style,
        };
        paint_card(&mut self.surface, &scene);
    }

    /// Encode the card as PNG; refuses a surface that was never painted.
    pub fn export(&self) -> Result<S::Png, ExportError> {
        export_png(&self.surface)
    }

    // ─── Photo ───────────────────────────────────────────────────────────

    pub fn begin_photo_load(&mut self) -> LoadTicket {
        self.photo_load.begin()
    }

    /// Adopt a decoded photo. The previous photo, if any, is dropped here,
    /// releasing its handle. The new photo is centered at the default
    /// display size. Returns `false` for stale tickets.
    pub fn finish_photo_load(&mut self, ticket: LoadTicket, image: S::Image) -> bool {
        if !self.photo_load.complete(ticket) {
            return false;
        }
        // A drag on the old photo must not carry over to the new one.
        if matches!(self.drag.map(|d| d.target), Some(DragTarget::Photo)) {
            self.drag = None;
        }
        let layer = PhotoLayer::centered(image, self.surface.size(), self.config.photo_size());
        log::debug!(
            "photo loaded at ({}, {}), replacing existing: {}",
            layer.position.x,
            layer.position.y,
            self.photo.is_some()
        );
        self.photo = Some(layer);
        self.render();
        true
    }

    /// The decode for `ticket` failed. The current photo stays.
    pub fn fail_photo_load(&mut self, ticket: LoadTicket) {
        if self.photo_load.complete(ticket) {
            log::warn!("photo load #{} failed; keeping current photo", ticket.id());
        }
    }

    /// Change the photo's display size, keeping its top-left corner.
    /// Returns `false` without a photo or for sizes that are not finite
    /// and positive.
    pub fn set_photo_size(&mut self, width: f64, height: f64) -> bool {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height)) {
            log::debug!("ignoring photo size {width}x{height}");
            return false;
        }
        let Some(photo) = self.photo.as_mut() else {
            return false;
        };
        photo.size = Size::new(width, height);
        self.render();
        true
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    pub fn photo_position(&self) -> Option<Point> {
        self.photo.as_ref().map(|p| p.position)
    }

    /// Current display size, or the default when no photo is loaded.
    pub fn photo_size(&self) -> Size {
        self.photo
            .as_ref()
            .map_or_else(|| self.config.photo_size(), |p| p.size)
    }

    // ─── Background ──────────────────────────────────────────────────────

    /// Select a configured background. The current background is released
    /// immediately and the card shows none until the load finishes.
    /// Returns `None` for a source that is not one of the configured choices.
    pub fn begin_background_load(&mut self, src: &str) -> Option<LoadTicket> {
        let Some(choice) = self.config.background(src).cloned() else {
            log::warn!("unknown background {src:?}");
            return None;
        };
        log::debug!("selecting background {:?}", choice.label);
        self.background = None;
        self.background_choice = Some(choice);
        Some(self.background_load.begin())
    }

    pub fn finish_background_load(&mut self, ticket: LoadTicket, image: S::Image) -> bool {
        if !self.background_load.complete(ticket) {
            return false;
        }
        self.background = Some(image);
        self.render();
        true
    }

    pub fn fail_background_load(&mut self, ticket: LoadTicket) {
        if self.background_load.complete(ticket) {
            log::warn!("background load #{} failed; card stays without one", ticket.id());
        }
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn background_choice(&self) -> Option<&BackgroundChoice> {
        self.background_choice.as_ref()
    }

    // ─── Labels ──────────────────────────────────────────────────────────

    /// Append a label at the surface center. Empty text is ignored.
    /// Returns `true` when a label was added (the host clears its field).
    pub fn add_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let size = self.surface.size();
        let center = Point::new(size.width / 2.0, size.height / 2.0);
        self.labels.push(TextLabel::new(text, center));
        log::debug!("label #{} {:?} added", self.labels.len() - 1, text);
        self.render();
        true
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    // ─── Dragging ────────────────────────────────────────────────────────

    /// Press at `p`: grab the photo, else the topmost label under it.
    /// Returns `true` if a drag started.
    pub fn start_drag(&mut self, p: Point) -> bool {
        let scene = CardScene {
            background: self.background.as_ref(),
            photo: self.photo.as_ref(),
            labels: &self.labels,
            corner_radius: self.config.corner_radius,
            text_style: &self.text_style,
        };
        let target = hit_test(&self.surface, &scene, p);

        let origin = match target {
            Some(DragTarget::Photo) => self.photo.as_ref().map(|photo| photo.position),
            Some(DragTarget::Label(i)) => self.labels.get(i).map(TextLabel::anchor),
            None => None,
        };
        self.drag = target.zip(origin).map(|(target, origin)| DragSession::new(target, p, origin));
        if let Some(session) = &self.drag {
            log::debug!("drag start {:?} offset {:?}", session.target, session.offset);
        }
        self.drag.is_some()
    }

    /// Move the grabbed entity so it keeps its press offset from `p`.
    /// Repaints on every call while dragging; no-op otherwise.
    pub fn drag_move(&mut self, p: Point) -> bool {
        let Some(session) = self.drag else {
            return false;
        };
        let origin = session.origin_for(p);
        match session.target {
            DragTarget::Photo => {
                if let Some(photo) = self.photo.as_mut() {
                    photo.position = origin;
                }
            }
            DragTarget::Label(i) => {
                if let Some(label) = self.labels.get_mut(i) {
                    label.set_anchor(origin);
                }
            }
        }
        self.render();
        true
    }

    /// End any drag. Safe to call at any time.
    pub fn stop_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            log::debug!("drag stop {:?}", session.target);
        }
    }

    pub fn drag_target(&self) -> Option<DragTarget> {
        self.drag.map(|d| d.target)
    }

    /// Dispatch a normalized pointer event. Returns `true` if the card was repainted.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.start_drag(Point::new(x, y));
                false
            }
            InputEvent::PointerMove { x, y } => self.drag_move(Point::new(x, y)),
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.stop_drag();
                false
            }
        }
    }

    // ─── Session ─────────────────────────────────────────────────────────

    /// Drop photo, background, and labels, cancel pending loads, repaint.
    pub fn reset(&mut self) {
        self.photo = None;
        self.background = None;
        self.background_choice = None;
        self.photo_load.cancel();
        self.background_load.cancel();
        self.labels.clear();
        self.drag = None;
        self.render();
        log::debug!("session reset");
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
