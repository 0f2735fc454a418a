/// Modal shown when the player touches an obstacle. Stays up until dismissed.
#[derive(Default)]
pub struct ContactOverlay {
    visible: bool,
}

impl ContactOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns true when the overlay has just been opened.
    pub fn update(&mut self, in_contact: bool) -> bool {
        let opened = in_contact && !self.visible;
        if opened {
            self.visible = true;
            log::info!("Showing contact overlay");
            present(true);
        }
        opened
    }

    pub fn dismiss(&mut self) {
        if self.visible {
            self.visible = false;
            log::info!("Contact overlay dismissed");
            present(false);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn present(_visible: bool) {}

#[cfg(target_arch = "wasm32")]
fn present(visible: bool) {
    web::set_visible(visible);
}

#[cfg(target_arch = "wasm32")]
pub mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use crate::config::OVERLAY_VIDEO_ID;

    const OVERLAY_ID: &str = "contact-overlay";

    const OVERLAY_STYLE: &str = "position: absolute; top: 0; left: 0; width: 100vw; \
        height: 100vh; background-color: rgba(0,0,0,0.5); display: none; \
        align-items: center; justify-content: center;";

    /// Builds the hidden overlay and wires the close button to `on_close`.
    pub fn install(on_close: impl FnMut() + 'static) -> Result<(), JsValue> {
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

        let overlay = doc.create_element("div")?;
        overlay.set_id(OVERLAY_ID);
        overlay.set_attribute("style", OVERLAY_STYLE)?;

        let content = doc.create_element("div")?;

        let frame_box = doc.create_element("div")?;
        frame_box.set_attribute("style", "width: 600px; max-width: 100vw; aspect-ratio: 16 / 9;")?;
        let iframe = doc.create_element("iframe")?;
        iframe.set_attribute(
            "src",
            &format!("https://www.youtube.com/embed/{}", OVERLAY_VIDEO_ID),
        )?;
        iframe.set_attribute("style", "width: 100%; height: 100%; border: 0;")?;
        iframe.set_attribute("allowfullscreen", "")?;
        frame_box.append_child(&iframe)?;

        let button: web_sys::HtmlButtonElement = doc.create_element("button")?.dyn_into()?;
        button.set_text_content(Some("閉じる"));
        button.set_attribute("style", "margin-top: 1rem;")?;
        let on_click = Closure::wrap(Box::new(on_close) as Box<dyn FnMut()>);
        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();

        content.append_child(&frame_box)?;
        content.append_child(&button)?;
        overlay.append_child(&content)?;
        body.append_child(&overlay)?;
        Ok(())
    }

    pub fn set_visible(visible: bool) {
        if let Some(overlay) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(OVERLAY_ID))
            .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
        {
            let display = if visible { "flex" } else { "none" };
            let _ = overlay.style().set_property("display", display);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_on_contact_and_stays_open() {
        let mut overlay = ContactOverlay::new();
        assert!(!overlay.update(false));
        assert!(!overlay.is_visible());

        assert!(overlay.update(true));
        assert!(overlay.is_visible());

        // Already open: not reported again, and leaving contact keeps it up.
        assert!(!overlay.update(true));
        assert!(!overlay.update(false));
        assert!(overlay.is_visible());
    }

    #[test]
    fn dismiss_hides_until_next_contact() {
        let mut overlay = ContactOverlay::new();
        overlay.update(true);
        overlay.dismiss();
        assert!(!overlay.is_visible());

        overlay.update(false);
        assert!(!overlay.is_visible());

        // Still touching the column reopens it.
        assert!(overlay.update(true));
        assert!(overlay.is_visible());
    }
}
