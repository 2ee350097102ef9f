//! Rotating "random fact" widget: a fresh fact every ten seconds with a
//! short opacity fade around the swap.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, window};

use crate::FACTS;
use crate::rng;

const ROTATE_MS: i32 = 10_000;
/// Swap delay; matches the 0.3s CSS transition so the text changes mid-fade.
const FADE_MS: i32 = 300;

pub(crate) fn init(doc: &Document) {
    let Some(el) = doc.get_element_by_id(super::FACT_ID) else {
        return;
    };
    let Ok(el) = el.dyn_into::<HtmlElement>() else {
        return;
    };

    // Initial fact straight away, with the fade transition installed.
    el.set_text_content(Some(FACTS[rng::rand_index(FACTS.len())]));
    let style = el.style();
    style.set_property("transition", "opacity 0.3s ease").ok();
    style.set_property("opacity", "1").ok();

    // The interval closure parks the upcoming fact here and one reusable
    // swap closure reads it back, so no per-rotation closure is leaked.
    let pending: Rc<RefCell<&'static str>> = Rc::new(RefCell::new(""));

    let swap = {
        let el = el.clone();
        let pending = pending.clone();
        Closure::wrap(Box::new(move || {
            el.set_text_content(Some(*pending.borrow()));
            el.style().set_property("opacity", "1").ok();
        }) as Box<dyn FnMut()>)
    };

    let rotate = Closure::wrap(Box::new(move || {
        *pending.borrow_mut() = FACTS[rng::rand_index(FACTS.len())];
        el.style().set_property("opacity", "0").ok();
        if let Some(win) = window() {
            win.set_timeout_with_callback_and_timeout_and_arguments_0(
                swap.as_ref().unchecked_ref(),
                FADE_MS,
            )
            .ok();
        }
    }) as Box<dyn FnMut()>);
    if let Some(win) = window() {
        win.set_interval_with_callback_and_timeout_and_arguments_0(
            rotate.as_ref().unchecked_ref(),
            ROTATE_MS,
        )
        .ok();
    }
    // The swap closure is owned by the rotate closure and outlives it here.
    rotate.forget();
}
