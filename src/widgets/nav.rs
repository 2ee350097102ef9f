//! Navigation glue: surprise-link button, sidebar/chat panel toggles,
//! nav-card hover parallax, smooth anchor scrolling, reveal-on-scroll.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, window,
};

use crate::SURPRISE_DESTINATIONS;
use crate::rng;

const SURPRISE_BUTTON_ID: &str = "surpriseBtn";
/// (button id, panel id) pairs wired to an `open` class toggle.
const PANEL_TOGGLES: [(&str, &str); 2] = [("sidebarToggle", "sidebar"), ("chatToggle", "chatPanel")];
const CARD_SELECTOR: &str = ".link-card";
const REVEAL_SELECTOR: &str = ".stat-card, .link-card";
/// Peak card tilt in degrees, reached when the pointer sits on an edge.
const MAX_TILT_DEG: f64 = 6.0;

pub(crate) fn init(doc: &Document) {
    init_surprise_button(doc);
    init_panel_toggles(doc);
    init_card_parallax(doc);
    init_smooth_scroll(doc);
    init_reveal_observer(doc);
}

fn init_surprise_button(doc: &Document) {
    let Some(btn) = doc.get_element_by_id(SURPRISE_BUTTON_ID) else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
        let url = SURPRISE_DESTINATIONS[rng::rand_index(SURPRISE_DESTINATIONS.len())];
        if let Some(win) = window() {
            win.location().set_href(url).ok();
        }
    }) as Box<dyn FnMut(_)>);
    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .ok();
    closure.forget();
}

fn init_panel_toggles(doc: &Document) {
    for (button_id, panel_id) in PANEL_TOGGLES {
        let Some(btn) = doc.get_element_by_id(button_id) else {
            continue;
        };
        let doc = doc.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            if let Some(panel) = doc.get_element_by_id(panel_id) {
                panel.class_list().toggle("open").ok();
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }
}

fn init_card_parallax(doc: &Document) {
    let Ok(cards) = doc.query_selector_all(CARD_SELECTOR) else {
        return;
    };
    for i in 0..cards.length() {
        let Some(node) = cards.get(i) else { continue };
        let Ok(card) = node.dyn_into::<HtmlElement>() else {
            continue;
        };

        // offset_x/offset_y are relative to the event target, which keeps the
        // math card-local without needing DomRect.
        let move_card = card.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let (rx, ry) = card_tilt(
                evt.offset_x() as f64,
                evt.offset_y() as f64,
                move_card.offset_width() as f64,
                move_card.offset_height() as f64,
            );
            move_card
                .style()
                .set_property(
                    "transform",
                    &format!("perspective(600px) rotateX({rx:.2}deg) rotateY({ry:.2}deg)"),
                )
                .ok();
        }) as Box<dyn FnMut(_)>);
        card.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();

        let leave_card = card.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            leave_card.style().set_property("transform", "").ok();
        }) as Box<dyn FnMut(_)>);
        card.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }
}

/// Map a pointer position inside a `width` x `height` card to
/// (rotateX, rotateY) degrees: zero at the center, `MAX_TILT_DEG` at an edge.
fn card_tilt(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    let rx = (0.5 - y / height) * 2.0 * MAX_TILT_DEG;
    let ry = (x / width - 0.5) * 2.0 * MAX_TILT_DEG;
    (rx, ry)
}

fn init_smooth_scroll(doc: &Document) {
    let Ok(anchors) = doc.query_selector_all("a[href^='#']") else {
        return;
    };
    for i in 0..anchors.length() {
        let Some(node) = anchors.get(i) else { continue };
        let Ok(anchor) = node.dyn_into::<Element>() else {
            continue;
        };
        let Some(href) = anchor.get_attribute("href") else {
            continue;
        };
        if href.len() < 2 {
            continue; // bare "#" has no target
        }
        let doc = doc.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            evt.prevent_default();
            if let Ok(Some(target)) = doc.query_selector(&href) {
                let opts = ScrollIntoViewOptions::new();
                opts.set_behavior(ScrollBehavior::Smooth);
                opts.set_block(ScrollLogicalPosition::Start);
                target.scroll_into_view_with_scroll_into_view_options(&opts);
            }
        }) as Box<dyn FnMut(_)>);
        anchor
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }
}

/// Fade cards in once they scroll into view.
fn init_reveal_observer(doc: &Document) {
    let closure = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Some(el) = target.dyn_ref::<HtmlElement>() {
                    let style = el.style();
                    style.set_property("opacity", "1").ok();
                    style.set_property("transform", "translateY(0)").ok();
                }
            }
        },
    ) as Box<dyn FnMut(_, _)>);

    let opts = IntersectionObserverInit::new();
    opts.set_threshold(&JsValue::from(0.1));
    opts.set_root_margin("0px 0px -50px 0px");
    let Ok(observer) =
        IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &opts)
    else {
        return;
    };
    closure.forget();

    if let Ok(targets) = doc.query_selector_all(REVEAL_SELECTOR) {
        for i in 0..targets.length() {
            if let Some(node) = targets.get(i) {
                if let Ok(el) = node.dyn_into::<Element>() {
                    observer.observe(&el);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilt_is_zero_at_card_center() {
        let (rx, ry) = card_tilt(100.0, 50.0, 200.0, 100.0);
        assert!(rx.abs() < 1e-9);
        assert!(ry.abs() < 1e-9);
    }

    #[test]
    fn tilt_peaks_at_edges() {
        let (rx, ry) = card_tilt(200.0, 0.0, 200.0, 100.0);
        assert!((rx - MAX_TILT_DEG).abs() < 1e-9);
        assert!((ry - MAX_TILT_DEG).abs() < 1e-9);
        let (rx, ry) = card_tilt(0.0, 100.0, 200.0, 100.0);
        assert!((rx + MAX_TILT_DEG).abs() < 1e-9);
        assert!((ry + MAX_TILT_DEG).abs() < 1e-9);
    }

    #[test]
    fn tilt_stays_bounded_inside_the_card() {
        for ix in 0..=20 {
            for iy in 0..=20 {
                let (rx, ry) = card_tilt(ix as f64 * 10.0, iy as f64 * 5.0, 200.0, 100.0);
                assert!(rx.abs() <= MAX_TILT_DEG + 1e-9);
                assert!(ry.abs() <= MAX_TILT_DEG + 1e-9);
            }
        }
    }

    #[test]
    fn degenerate_card_never_tilts() {
        assert_eq!(card_tilt(10.0, 10.0, 0.0, 100.0), (0.0, 0.0));
        assert_eq!(card_tilt(10.0, 10.0, 200.0, 0.0), (0.0, 0.0));
    }
}
