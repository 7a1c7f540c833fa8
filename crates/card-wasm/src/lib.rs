//! WASM bridge for Photo Card.
//!
//! Compiled via `wasm-pack build --target web`. The page creates one
//! `CardEditor` per `<canvas>` and forwards its controls and pointer
//! events; everything else happens in `CardController`.

mod assets;
mod render2d;

use std::cell::RefCell;
use std::rc::Rc;

use card_core::CardConfig;
use card_editor::{CardController, ClientRect, InputEvent, PointerSample};
use card_render::ExportError;
use render2d::Canvas2dSurface;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlAnchorElement, HtmlCanvasElement, HtmlSelectElement, MouseEvent, TouchEvent,
};

type Session = Rc<RefCell<CardController<Canvas2dSurface>>>;

/// The page-facing editor.
///
/// Load callbacks hold a second handle on the session, so the controller
/// lives behind `Rc<RefCell<..>>`. No borrow is held across a call back
/// into JavaScript.
#[wasm_bindgen]
pub struct CardEditor {
    session: Session,
}

#[wasm_bindgen]
impl CardEditor {
    /// Take over `canvas`, sizing it from the config. `config_json` may
    /// be partial; omitted keys keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<CardEditor, JsValue> {
        console_error_panic_hook_setup();

        let config = match config_json.as_deref() {
            Some(json) => CardConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => CardConfig::default(),
        };
        logger_setup(config.log_level());

        let surface = Canvas2dSurface::new(canvas, config.surface_width, config.surface_height)?;
        log::info!(
            "card editor ready: {}x{}, {} backgrounds",
            config.surface_width,
            config.surface_height,
            config.backgrounds.len()
        );
        Ok(Self {
            session: Rc::new(RefCell::new(CardController::new(config, surface))),
        })
    }

    // ─── Assets ──────────────────────────────────────────────────────────

    /// Decode an uploaded file as the photo. `on_loaded(width, height)`
    /// fires once the photo is on the card, so the page can sync its size
    /// inputs. A file that fails to decode leaves the card unchanged.
    pub fn load_photo(&self, file: web_sys::File, on_loaded: Option<js_sys::Function>) -> Result<(), JsValue> {
        let url = web_sys::Url::create_object_url_with_blob(&file)?;
        let ticket = self.session.borrow_mut().begin_photo_load();
        log::debug!("photo load #{} from {:?}", ticket.id(), file.name());

        let session = Rc::clone(&self.session);
        let started = assets::load_image(&url, Some(url.clone()), move |result| {
            let placed = {
                let mut s = session.borrow_mut();
                match result {
                    Ok(image) => {
                        if s.finish_photo_load(ticket, image) {
                            Some(s.photo_size())
                        } else {
                            None
                        }
                    }
                    Err(e) => {
                        log::warn!("{e}");
                        s.fail_photo_load(ticket);
                        None
                    }
                }
            };
            if let (Some(size), Some(callback)) = (placed, on_loaded) {
                if let Err(e) = callback.call2(&JsValue::NULL, &size.width.into(), &size.height.into()) {
                    log::warn!("photo callback threw: {e:?}");
                }
            }
        });
        if let Err(e) = started {
            // The load callback never runs, so settle the ticket and URL here.
            if let Err(revoke_err) = web_sys::Url::revoke_object_url(&url) {
                log::warn!("revokeObjectURL failed: {revoke_err:?}");
            }
            self.session.borrow_mut().fail_photo_load(ticket);
            return Err(e);
        }
        Ok(())
    }

    /// Switch to one of the configured backgrounds. Returns `false` for a
    /// source the config does not list.
    pub fn select_background(&self, src: &str) -> Result<bool, JsValue> {
        let Some(ticket) = self.session.borrow_mut().begin_background_load(src) else {
            return Ok(false);
        };
        let session = Rc::clone(&self.session);
        let started = assets::load_image(src, None, move |result| {
            let mut s = session.borrow_mut();
            match result {
                Ok(image) => {
                    s.finish_background_load(ticket, image);
                }
                Err(e) => {
                    log::warn!("{e}");
                    s.fail_background_load(ticket);
                }
            }
        });
        if let Err(e) = started {
            self.session.borrow_mut().fail_background_load(ticket);
            return Err(e);
        }
        Ok(true)
    }

    /// `[{"label": .., "src": ..}, ..]`
    pub fn background_choices_json(&self) -> String {
        serde_json::to_string(&self.session.borrow().config().backgrounds).unwrap_or_default()
    }

    /// Append one `<option>` per configured background to `select`.
    pub fn populate_background_select(&self, select: &HtmlSelectElement) -> Result<(), JsValue> {
        let session = self.session.borrow();
        for choice in &session.config().backgrounds {
            let option = web_sys::HtmlOptionElement::new_with_text_and_value(&choice.label, &choice.src)?;
            select.add_with_html_option_element(&option)?;
        }
        Ok(())
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    /// Add a label at the card center. Returns `true` if one was added,
    /// so the page knows to clear its text field.
    pub fn add_text(&self, text: &str) -> bool {
        self.session.borrow_mut().add_text(text)
    }

    pub fn set_photo_size(&self, width: f64, height: f64) -> bool {
        self.session.borrow_mut().set_photo_size(width, height)
    }

    /// `{"width": .., "height": ..}`
    pub fn photo_size_json(&self) -> String {
        let size = self.session.borrow().photo_size();
        serde_json::json!({ "width": size.width, "height": size.height }).to_string()
    }

    /// `[{"content": .., "x": .., "y": ..}, ..]`
    pub fn labels_json(&self) -> String {
        serde_json::to_string(self.session.borrow().labels()).unwrap_or_default()
    }

    pub fn render(&self) {
        self.session.borrow_mut().render();
    }

    /// Drop the photo, background, and labels.
    pub fn reset(&self) {
        self.session.borrow_mut().reset();
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    pub fn handle_mouse_down(&self, event: &MouseEvent) -> bool {
        let sample = mouse_sample(event);
        self.pointer_down(&sample)
    }

    pub fn handle_mouse_move(&self, event: &MouseEvent) -> bool {
        let sample = mouse_sample(event);
        self.pointer_move(&sample)
    }

    pub fn handle_mouse_up(&self) -> bool {
        self.dispatch(InputEvent::PointerUp)
    }

    pub fn handle_mouse_leave(&self) -> bool {
        self.dispatch(InputEvent::PointerLeave)
    }

    /// Touch handlers cancel the default action so the page does not
    /// scroll while a finger drags on the card.
    pub fn handle_touch_start(&self, event: &TouchEvent) -> bool {
        event.prevent_default();
        match first_touch(event) {
            Some(sample) => self.pointer_down(&sample),
            None => false,
        }
    }

    pub fn handle_touch_move(&self, event: &TouchEvent) -> bool {
        event.prevent_default();
        match first_touch(event) {
            Some(sample) => self.pointer_move(&sample),
            None => false,
        }
    }

    pub fn handle_touch_end(&self, event: &TouchEvent) -> bool {
        event.prevent_default();
        self.dispatch(InputEvent::PointerUp)
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Save the card as a PNG download. A card that was never drawn on
    /// shows the configured alert instead and returns `false`.
    pub fn download(&self) -> Result<bool, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let session = self.session.borrow();
        let config = session.config();

        let data_url = match session.export() {
            Ok(url) => url,
            Err(ExportError::BlankSurface) => {
                log::info!("export refused: card is blank");
                window.alert_with_message(&config.blank_export_message)?;
                return Ok(false);
            }
            Err(e) => return Err(JsValue::from_str(&e.to_string())),
        };

        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        link.set_download(&config.export_filename);
        link.set_href(&data_url);
        link.click();
        log::debug!("exported {}", config.export_filename);
        Ok(true)
    }
}

impl CardEditor {
    fn client_rect(&self) -> ClientRect {
        let rect = self.session.borrow().surface().canvas().get_bounding_client_rect();
        ClientRect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        }
    }

    fn pointer_down(&self, sample: &PointerSample) -> bool {
        let surface = self.session.borrow().config().surface_size();
        self.dispatch(InputEvent::pointer_down(sample, &self.client_rect(), surface))
    }

    fn pointer_move(&self, sample: &PointerSample) -> bool {
        let surface = self.session.borrow().config().surface_size();
        self.dispatch(InputEvent::pointer_move(sample, &self.client_rect(), surface))
    }

    fn dispatch(&self, event: InputEvent) -> bool {
        self.session.borrow_mut().handle_input(&event)
    }
}

fn mouse_sample(event: &MouseEvent) -> PointerSample {
    PointerSample::mouse(event.client_x() as f64, event.client_y() as f64)
}

fn first_touch(event: &TouchEvent) -> Option<PointerSample> {
    let list = event.touches();
    let touches: Vec<(f64, f64)> = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| (t.client_x() as f64, t.client_y() as f64))
        .collect();
    PointerSample::first_touch(&touches)
}

// ─── Logging and panics ──────────────────────────────────────────────────

fn logger_setup(level: log::Level) {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_LOGGER: Once = Once::new();
        SET_LOGGER.call_once(|| wasm_logger::init(wasm_logger::Config::new(level)));
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = level;
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Photo Card WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
