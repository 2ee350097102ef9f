//! Animated canvas particle background.
//!
//! Binds the pure simulation in [`field`] to the page's `<canvas>`: sizes the
//! surface to the viewport, regenerates the set on resize, and drives one
//! `step()` + draw per display frame through a self-rescheduling
//! `requestAnimationFrame` closure. The whole feature is a silent no-op on
//! pages without the canvas element or a usable 2d context.

use tracing::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window, window};

pub mod field;

pub use field::{FieldConfig, Particle, ParticleField};

use crate::rng::XorShift64;

/// Canvas element id the site exposes for the background layer.
const CANVAS_ID: &str = "particleCanvas";

/// Live renderer state: the canvas pair plus the simulation it draws.
struct FieldRuntime {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    field: ParticleField,
    gate: FrameGate,
}

thread_local! {
    static FIELD_STATE: std::cell::RefCell<Option<FieldRuntime>> = std::cell::RefCell::new(None);
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Wire the background canvas and start the frame loop. Missing canvas or
/// context means the feature is absent on this page; both return `Ok(())`
/// without touching anything.
pub(crate) fn start_particle_field() -> Result<(), JsValue> {
    let Some(win) = window() else { return Ok(()) };
    let Some(doc) = win.document() else { return Ok(()) };
    let Some(el) = doc.get_element_by_id(CANVAS_ID) else {
        return Ok(());
    };
    let Ok(canvas) = el.dyn_into::<HtmlCanvasElement>() else {
        return Ok(());
    };
    let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
        Ok(Some(obj)) => match obj.dyn_into() {
            Ok(ctx) => ctx,
            Err(_) => return Ok(()),
        },
        // Context creation failed or was refused: skip the whole feature.
        _ => return Ok(()),
    };

    let mut runtime = FieldRuntime {
        canvas,
        ctx,
        field: ParticleField::new(FieldConfig::default(), XorShift64::from_clock()),
        gate: FrameGate::new(),
    };
    fit_to_viewport(&win, &mut runtime);
    info!(
        particles = runtime.field.particles().len(),
        "particle field started"
    );
    FIELD_STATE.with(|cell| cell.replace(Some(runtime)));

    // Regenerate the whole set whenever the viewport changes.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let Some(win) = window() else { return };
            FIELD_STATE.with(|cell| {
                if let Some(rt) = cell.borrow_mut().as_mut() {
                    fit_to_viewport(&win, rt);
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Page teardown: release the scheduled frame so no orphan callback fires.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            shutdown_field();
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    Ok(())
}

/// Size the canvas to the viewport and regenerate the particle set.
fn fit_to_viewport(win: &Window, rt: &mut FieldRuntime) {
    let width = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
        .max(0.0) as u32;
    let height = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
        .max(0.0) as u32;
    rt.canvas.set_width(width);
    rt.canvas.set_height(height);
    rt.field.resize(width as f64, height as f64);
    debug!(
        width,
        height,
        particles = rt.field.particles().len(),
        "particle field resized"
    );
}

fn start_frame_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        let live = FIELD_STATE.with(|cell| match cell.borrow_mut().as_mut() {
            Some(rt) if rt.gate.is_live() => {
                rt.field.step();
                render(rt);
                true
            }
            _ => false,
        });
        // Torn down since the frame was scheduled: stop rescheduling.
        if !live {
            return;
        }
        request_next(&f);
    }) as Box<dyn FnMut(f64)>));
    request_next(&g);
}

/// Schedule the next frame and record its handle for teardown.
fn request_next(cb: &FrameCallback) {
    let Some(win) = window() else { return };
    if let Some(closure) = cb.borrow().as_ref() {
        if let Ok(handle) = win.request_animation_frame(closure.as_ref().unchecked_ref()) {
            FIELD_STATE.with(|cell| {
                if let Some(rt) = cell.borrow_mut().as_mut() {
                    rt.gate.arm(handle);
                }
            });
        }
    }
}

/// Cancel the pending frame, at most once.
fn shutdown_field() {
    FIELD_STATE.with(|cell| {
        if let Some(rt) = cell.borrow_mut().as_mut() {
            if let Some(handle) = rt.gate.shutdown() {
                if let Some(win) = window() {
                    let _ = win.cancel_animation_frame(handle);
                }
                debug!("particle field stopped");
            }
        }
    });
}

fn render(rt: &FieldRuntime) {
    let ctx = &rt.ctx;
    let w = rt.canvas.width() as f64;
    let h = rt.canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, w, h);

    let color = rt.field.config().color;
    for p in rt.field.particles() {
        ctx.set_fill_style_str(&rgba(color, p.opacity));
        ctx.begin_path();
        ctx.arc(p.x, p.y, p.radius, 0.0, std::f64::consts::TAU).ok();
        ctx.fill();
    }

    ctx.set_line_width(0.5);
    let particles = rt.field.particles();
    rt.field.for_each_link(|a, b, alpha| {
        ctx.set_stroke_style_str(&rgba(color, alpha));
        line(ctx, particles[a].x, particles[a].y, particles[b].x, particles[b].y);
    });
}

fn rgba((r, g, b): (u8, u8, u8), alpha: f64) -> String {
    format!("rgba({r}, {g}, {b}, {alpha:.3})")
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}

/// Records the most recently scheduled animation-frame handle and makes
/// teardown idempotent: the handle can be taken for cancellation at most
/// once, and a shut-down gate refuses to arm again.
#[derive(Debug, Default)]
struct FrameGate {
    handle: Option<i32>,
    shut: bool,
}

impl FrameGate {
    fn new() -> Self {
        Self::default()
    }

    fn is_live(&self) -> bool {
        !self.shut
    }

    fn arm(&mut self, handle: i32) {
        if !self.shut {
            self.handle = Some(handle);
        }
    }

    /// First call yields the pending handle (if any); every later call
    /// yields `None`.
    fn shutdown(&mut self) -> Option<i32> {
        self.shut = true;
        self.handle.take()
    }
}
