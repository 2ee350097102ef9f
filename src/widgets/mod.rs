//! Page widgets: live clock, rotating facts, surprise link, panel toggles,
//! nav-card parallax, smooth anchor scrolling, reveal-on-scroll.
//!
//! Every widget looks its elements up by stable id/selector and skips itself
//! silently when they are absent — a page without the element simply doesn't
//! carry that feature. The clock/fact pair additionally tolerates a page that
//! streams its layout in late: lookup is retried on a bounded timer before
//! giving up quietly.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, window};

mod clock;
mod facts;
mod nav;

pub(crate) const CLOCK_ID: &str = "clockTime";
pub(crate) const FACT_ID: &str = "randomFact";

/// Poll cadence and cap for the clock/fact readiness retry (5 s worst case).
const READY_POLL_INTERVAL_MS: i32 = 100;
const READY_POLL_LIMIT: u32 = 50;

type PollCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut()>>>>;

/// Wire all widgets, waiting for DOMContentLoaded first when the document is
/// still parsing.
pub(crate) fn start_widgets() -> Result<(), JsValue> {
    let Some(win) = window() else { return Ok(()) };
    let Some(doc) = win.document() else { return Ok(()) };

    if doc.ready_state() == "loading" {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                init_all(&doc);
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())?;
        closure.forget();
    } else {
        init_all(&doc);
    }
    Ok(())
}

fn init_all(doc: &Document) {
    nav::init(doc);
    if clock_and_facts_present(doc) {
        init_clock_and_facts(doc);
    } else {
        poll_for_clock_and_facts();
    }
}

fn clock_and_facts_present(doc: &Document) -> bool {
    doc.get_element_by_id(CLOCK_ID).is_some() && doc.get_element_by_id(FACT_ID).is_some()
}

fn init_clock_and_facts(doc: &Document) {
    clock::init(doc);
    facts::init(doc);
}

/// Bounded retry for the clock/fact nodes: the host page builds parts of its
/// layout after load, so poll a fixed number of times, then give up silently.
fn poll_for_clock_and_facts() {
    let f: PollCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    let mut attempts = 0u32;
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let Some(doc) = window().and_then(|w| w.document()) else {
            return;
        };
        if clock_and_facts_present(&doc) {
            init_clock_and_facts(&doc);
            return;
        }
        attempts += 1;
        if attempts < READY_POLL_LIMIT {
            schedule_poll(&f);
        } else {
            tracing::debug!("clock/fact nodes never appeared, giving up");
        }
    }) as Box<dyn FnMut()>));
    schedule_poll(&g);
}

fn schedule_poll(cb: &PollCallback) {
    let Some(win) = window() else { return };
    if let Some(closure) = cb.borrow().as_ref() {
        win.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            READY_POLL_INTERVAL_MS,
        )
        .ok();
    }
}
