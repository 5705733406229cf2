//! Browser driver for the soccer simulator
//!
//! Owns a `MatchSim` and a Canvas 2D renderer. JavaScript runs the
//! `requestAnimationFrame` loop and calls `frame(timestamp)` once per display
//! frame; everything else (menus, audio, persistence) stays on the JS side and
//! talks to this module through JSON strings.

pub mod camera;

#[cfg(target_arch = "wasm32")]
mod logger;
#[cfg(target_arch = "wasm32")]
mod renderer;

/// Turns `requestAnimationFrame` timestamps into frame deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimer {
    last: Option<f64>,
}

impl FrameTimer {
    /// Milliseconds since the previous call; zero on the first call and
    /// whenever the timestamp goes backwards
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last {
            Some(last) if now_ms > last => (now_ms - last) as f32,
            _ => 0.0,
        };
        self.last = Some(now_ms);
        dt
    }

    /// Forget the previous timestamp, e.g. after the tab was hidden
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(target_arch = "wasm32")]
mod client {
    use soccer_core::MatchSim;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use crate::renderer::Renderer;
    use crate::FrameTimer;

    fn js_error(err: soccer_core::CoreError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn to_json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string(value).unwrap_or_else(|err| {
            log::warn!("serialization failed: {err}");
            "null".to_string()
        })
    }

    #[wasm_bindgen]
    pub struct SoccerClient {
        sim: MatchSim,
        renderer: Renderer,
        timer: FrameTimer,
        /// Cleared by `reset_to_menu`; JS stops requesting frames when `frame` returns `false`
        running: bool,
        last_events: String,
    }

    #[wasm_bindgen]
    impl SoccerClient {
        #[wasm_bindgen(constructor)]
        pub fn new(
            canvas: HtmlCanvasElement,
            config: &str,
            team_a: &str,
            team_b: &str,
            custom_buffs: Option<String>,
            seed: u64,
        ) -> Result<SoccerClient, JsValue> {
            crate::logger::init(log::LevelFilter::Info);
            let sim = MatchSim::from_json(config, team_a, team_b, custom_buffs.as_deref(), seed).map_err(js_error)?;
            let renderer = Renderer::new(canvas, &sim)?;
            Ok(SoccerClient {
                sim,
                renderer,
                timer: FrameTimer::default(),
                running: false,
                last_events: "[]".to_string(),
            })
        }

        pub fn start_match(&mut self) {
            self.sim.start_match();
            self.timer.reset();
            self.running = true;
        }

        pub fn restart(&mut self) {
            self.sim.restart();
            self.timer.reset();
            self.running = true;
        }

        pub fn reset_to_menu(&mut self) -> Result<(), JsValue> {
            self.sim.reset_to_menu();
            self.running = false;
            self.renderer.render(&self.sim)
        }

        pub fn toggle_pause(&mut self) -> bool {
            self.sim.toggle_pause()
        }

        /// One display frame. Returns whether the loop should keep going.
        pub fn frame(&mut self, timestamp_ms: f64) -> Result<bool, JsValue> {
            if !self.running {
                return Ok(false);
            }
            let dt = self.timer.tick(timestamp_ms);
            let events = self.sim.frame(dt).to_vec();
            self.last_events = to_json(&events);
            self.renderer.observe(&mut self.sim, &events);
            self.renderer.render(&self.sim)?;
            Ok(true)
        }

        /// Events raised by the last frame, as a JSON array
        pub fn events(&self) -> String {
            self.last_events.clone()
        }

        pub fn scoreboard(&self) -> String {
            to_json(&self.sim.scoreboard())
        }

        pub fn active_buffs(&self) -> String {
            to_json(&self.sim.active_buffs())
        }

        pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
            self.renderer.resize(width, height, &self.sim);
            self.renderer.render(&self.sim)
        }

        /// Copy every rendered frame into `target`; `None` stops recording
        pub fn set_recording_canvas(&mut self, target: Option<HtmlCanvasElement>) -> Result<(), JsValue> {
            self.renderer.set_recording(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timer() {
        let mut timer = FrameTimer::default();
        assert_eq!(timer.tick(1000.0), 0.0, "First frame has no delta");
        assert_eq!(timer.tick(1016.0), 16.0);
        assert_eq!(timer.tick(1010.0), 0.0, "Clock going backwards is ignored");
        assert_eq!(timer.tick(1030.0), 20.0);

        timer.reset();
        assert_eq!(timer.tick(5000.0), 0.0);
    }
}
