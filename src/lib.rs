//! Site FX core crate.
//!
//! Decorative front end for a personal site, compiled to WASM: an animated
//! canvas particle background plus small DOM widgets (live clock, rotating
//! facts, surprise link, panel toggles, nav-card hover parallax, smooth
//! scrolling, reveal-on-scroll). `start_site()` wires everything; a feature
//! whose page elements are missing skips itself silently.

use wasm_bindgen::prelude::*;

pub mod particles;
pub mod rng;
mod widgets;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // Route tracing output to the browser console.
    tracing_wasm::set_as_global_default();
}

// -----------------------------------------------------------------------------
// Shared page datasets
// -----------------------------------------------------------------------------

/// Fact strings cycled by the `randomFact` widget.
pub const FACTS: &[&str] = &[
    "Cats sleep 70% of their lives",
    "A group of cats is called a clowder",
    "Cats can rotate their ears 180°",
    "A cat's purr vibrates at 25-150 Hz",
    "Cats have 32 muscles in each ear",
    "A cat can jump 6x its length",
    "Cats spend 30-50% of awake time grooming",
    "A cat's nose print is unique",
    "Java is better than Python",
    "I am a knockoff Hitori Gotoh",
];

/// Destinations for the surprise-link button; one is chosen uniformly per
/// click.
pub const SURPRISE_DESTINATIONS: &[&str] = &[
    "https://en.wikipedia.org/wiki/Special:Random",
    "https://theuselessweb.com/",
    "https://cataas.com/cat",
    "https://pointerpointer.com/",
    "https://www.window-swap.com/",
];

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Start every page feature. Safe to call on any page: features whose
/// elements are absent initialize to nothing (no errors, no retries beyond
/// the bounded clock/fact readiness poll).
#[wasm_bindgen]
pub fn start_site() -> Result<(), JsValue> {
    particles::start_particle_field()?;
    widgets::start_widgets()
}

/// Milliseconds since page load via `performance.now()`; 0.0 outside a
/// browser (native tests seed the PRNG explicitly instead).
pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
