use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use rand::Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use crate::constants::{
    CONFETTI_DECAY, CONFETTI_GRAVITY, CONFETTI_ORIGIN_Y, CONFETTI_PARTICLES,
    CONFETTI_SPREAD_DEG, CONFETTI_START_VELOCITY, CONFETTI_TICKS,
};

const COLORS: [&str; 7] = [
    "#26ccff", "#a25afd", "#ff5e7e", "#88ff5a", "#fcff42", "#ffa62d", "#ff36ff",
];

struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    spin: f64,
    wobble: f64,
    size: f64,
    color: &'static str,
    tick: u32,
}

impl Particle {
    fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vx *= CONFETTI_DECAY;
        self.vy = self.vy * CONFETTI_DECAY + CONFETTI_GRAVITY;
        self.wobble += self.spin;
        self.tick += 1;
    }

    fn alive(&self, height: f64) -> bool {
        self.tick < CONFETTI_TICKS && self.y < height + self.size
    }
}

// Non-deprecated helper to set the fill style via property assignment.
fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

/// Fire one burst of confetti over the page. The overlay canvas removes
/// itself once every particle has faded or fallen off screen.
pub fn burst<R: Rng + ?Sized>(window: &Window, document: &Document, rng: &mut R) -> Result<(), JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(800.0);
    let height = window.inner_height()?.as_f64().unwrap_or(600.0);
    let dpr = window.device_pixel_ratio();

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_width((width * dpr).round().max(1.0) as u32);
    canvas.set_height((height * dpr).round().max(1.0) as u32);
    canvas.set_attribute(
        "style",
        "position:fixed;inset:0;width:100%;height:100%;pointer-events:none;z-index:1000",
    )?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or("no 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()?;
    ctx.scale(dpr, dpr)?;
    document
        .body()
        .ok_or("no body")?
        .append_child(&canvas)?;

    let origin = (width / 2.0, height * CONFETTI_ORIGIN_Y);
    let spread = CONFETTI_SPREAD_DEG.to_radians();
    let particles: Vec<Particle> = (0..CONFETTI_PARTICLES)
        .map(|_| {
            let angle = -PI / 2.0 + rng.gen_range(-0.5..0.5) * spread;
            let speed = CONFETTI_START_VELOCITY * rng.gen_range(0.5..1.0);
            Particle {
                x: origin.0,
                y: origin.1,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                spin: rng.gen_range(0.05..0.3),
                wobble: rng.gen_range(0.0..2.0 * PI),
                size: rng.gen_range(6.0..11.0),
                color: COLORS[rng.gen_range(0..COLORS.len())],
                tick: 0,
            }
        })
        .collect();

    animate(canvas, ctx, particles, (width, height));
    Ok(())
}

fn draw(ctx: &CanvasRenderingContext2d, particles: &[Particle], size: (f64, f64)) {
    ctx.clear_rect(0.0, 0.0, size.0, size.1);
    for p in particles {
        ctx.set_global_alpha(1.0 - p.tick as f64 / CONFETTI_TICKS as f64);
        set_fill_style(ctx, p.color);
        // flat rectangle flipping around its long axis
        let h = p.size * p.wobble.cos().abs().max(0.2);
        ctx.fill_rect(p.x - p.size / 2.0, p.y - h / 2.0, p.size, h);
    }
    ctx.set_global_alpha(1.0);
}

fn animate(
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    mut particles: Vec<Particle>,
    size: (f64, f64),
) {
    type RafClosure = Closure<dyn FnMut(f64)>;
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        for p in particles.iter_mut() {
            p.step();
        }
        particles.retain(|p| p.alive(size.1));
        if particles.is_empty() {
            canvas.remove();
            // dropping the closure ends the loop
            let _ = f.borrow_mut().take();
            return;
        }
        draw(&ctx, &particles, size);
        if let (Some(win), Some(cb)) = (web_sys::window(), f.borrow().as_ref()) {
            let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(win), Some(cb)) = (web_sys::window(), g.borrow().as_ref()) {
        let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
