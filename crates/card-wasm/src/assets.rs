//! Browser image loading.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlImageElement, Url};

/// A decoded `<img>` the canvas can draw.
///
/// When the image came from an uploaded file it owns the object URL,
/// which is revoked on drop so a replaced photo releases its blob.
pub struct WebImage {
    element: HtmlImageElement,
    object_url: Option<String>,
}

impl WebImage {
    pub fn element(&self) -> &HtmlImageElement {
        &self.element
    }
}

impl Drop for WebImage {
    fn drop(&mut self) {
        if let Some(url) = self.object_url.take() {
            revoke(&url);
        }
    }
}

fn revoke(url: &str) {
    if let Err(e) = Url::revoke_object_url(url) {
        log::warn!("revokeObjectURL failed: {e:?}");
    }
}

type Done = Box<dyn FnOnce(Result<WebImage, String>)>;

/// Start decoding `src` and call `on_done` exactly once with the result.
///
/// Pass `object_url` when `src` is an object URL this load owns; it is
/// revoked on failure and handed to the `WebImage` on success.
pub fn load_image(
    src: &str,
    object_url: Option<String>,
    on_done: impl FnOnce(Result<WebImage, String>) + 'static,
) -> Result<(), JsValue> {
    let element = HtmlImageElement::new()?;
    let done: Rc<RefCell<Option<Done>>> = Rc::new(RefCell::new(Some(Box::new(on_done))));

    let onload = {
        let done = Rc::clone(&done);
        let element = element.clone();
        let object_url = object_url.clone();
        Closure::once_into_js(move || {
            element.set_onload(None);
            element.set_onerror(None);
            // Take first: the callback may start another load.
            let callback = done.borrow_mut().take();
            if let Some(callback) = callback {
                callback(Ok(WebImage {
                    element,
                    object_url,
                }));
            }
        })
    };

    let onerror = {
        let element = element.clone();
        let src = src.to_string();
        Closure::once_into_js(move || {
            element.set_onload(None);
            element.set_onerror(None);
            if let Some(url) = &object_url {
                revoke(url);
            }
            let callback = done.borrow_mut().take();
            if let Some(callback) = callback {
                callback(Err(format!("could not decode image {src}")));
            }
        })
    };

    element.set_onload(Some(onload.unchecked_ref()));
    element.set_onerror(Some(onerror.unchecked_ref()));
    element.set_src(src);
    Ok(())
}
