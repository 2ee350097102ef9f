//! Live clock widget: local `HH:MM:SS` in the `clockTime` node, once
//! immediately and then every second.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, window};

const TICK_MS: i32 = 1_000;

pub(crate) fn init(doc: &Document) {
    let Some(el) = doc.get_element_by_id(super::CLOCK_ID) else {
        return;
    };
    render_into(&el);
    let closure = Closure::wrap(Box::new(move || {
        render_into(&el);
    }) as Box<dyn FnMut()>);
    if let Some(win) = window() {
        win.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TICK_MS,
        )
        .ok();
    }
    closure.forget();
}

fn render_into(el: &Element) {
    let now = js_sys::Date::new_0();
    let text = format_clock(now.get_hours(), now.get_minutes(), now.get_seconds());
    el.set_text_content(Some(&text));
}

/// Zero-padded `HH:MM:SS`.
fn format_clock(hours: u32, minutes: u32, seconds: u32) -> String {
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::format_clock;

    #[test]
    fn pads_every_component() {
        assert_eq!(format_clock(0, 0, 0), "00:00:00");
        assert_eq!(format_clock(9, 5, 3), "09:05:03");
        assert_eq!(format_clock(23, 59, 59), "23:59:59");
    }
}
