pub mod draw;

use soccer_core::{GameEvent, MatchSim, Particle};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::Camera;

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("2d context has an unexpected type"))
}

pub struct Renderer {
    pub canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub camera: Camera,
    /// Externally owned canvas every rendered frame is copied into
    recording: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
    /// Text for the first-pickup tutorial overlay
    tutorial: Option<String>,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement, sim: &MatchSim) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        let camera = Camera::fit(&sim.pitch, canvas.width() as f32, canvas.height() as f32);
        Ok(Self {
            canvas,
            ctx,
            camera,
            recording: None,
            tutorial: None,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32, sim: &MatchSim) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.camera = Camera::fit(&sim.pitch, width as f32, height as f32);
    }

    pub fn set_recording(&mut self, target: Option<HtmlCanvasElement>) -> Result<(), JsValue> {
        self.recording = match target {
            Some(canvas) => {
                let ctx = context_2d(&canvas)?;
                Some((canvas, ctx))
            }
            None => None,
        };
        Ok(())
    }

    /// React to this frame's events before drawing
    pub fn observe(&mut self, sim: &mut MatchSim, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::ScreenShake { intensity } => self.camera.shake(*intensity),
                GameEvent::FirstBuffPickup { key, .. } => {
                    self.tutorial = sim
                        .catalog
                        .get(key)
                        .map(|def| format!("{}: {}", def.name, def.description));
                }
                _ => {}
            }
        }
        if sim.config.screen_shake {
            self.camera.update(&mut sim.rng);
        }
    }

    pub fn render(&mut self, sim: &MatchSim) -> Result<(), JsValue> {
        let (width, height) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.set_fill_style_str("#14532d");
        self.ctx.fill_rect(0.0, 0.0, width, height);

        let bodies = sim.bodies();
        let field_buffs = sim.field_buffs();
        let particles: Vec<Particle> = sim.world.query::<&Particle>().iter().map(|(_, p)| *p).collect();

        draw::field(&self.ctx, &self.camera, sim)?;
        draw::field_buffs(&self.ctx, &self.camera, sim, &field_buffs)?;
        draw::bodies(&self.ctx, &self.camera, sim, &bodies)?;
        draw::particles(&self.ctx, &self.camera, &particles)?;
        draw::overlays(&self.ctx, width, height, sim, self.tutorial.as_deref())?;

        if let Some((target, target_ctx)) = &self.recording {
            target_ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                &self.canvas,
                0.0,
                0.0,
                target.width() as f64,
                target.height() as f64,
            )?;
        }
        Ok(())
    }
}
