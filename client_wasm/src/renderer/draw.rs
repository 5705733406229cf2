//! Canvas 2D drawing for each layer of the frame

use std::f64::consts::TAU;

use glam::Vec2;
use soccer_core::{Body, BodyId, FieldBuff, MatchPhase, MatchSim, Particle, Side, TrapKind};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Camera;

const GRASS: &str = "#2f7d32";
const GRASS_STRIPE: &str = "#2a722d";
const LINE: &str = "rgba(255, 255, 255, 0.85)";
const STRIPES: usize = 10;

fn circle(ctx: &CanvasRenderingContext2d, at: Vec2, radius: f32) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(at.x as f64, at.y as f64, radius.max(0.0) as f64, 0.0, TAU)
}

fn line(ctx: &CanvasRenderingContext2d, from: Vec2, to: Vec2) {
    ctx.begin_path();
    ctx.move_to(from.x as f64, from.y as f64);
    ctx.line_to(to.x as f64, to.y as f64);
    ctx.stroke();
}

fn rect(ctx: &CanvasRenderingContext2d, camera: &Camera, min: Vec2, max: Vec2, fill: bool) {
    let (a, b) = (camera.to_screen(min), camera.to_screen(max));
    let (x, y, w, h) = (a.x as f64, a.y as f64, (b.x - a.x) as f64, (b.y - a.y) as f64);
    if fill {
        ctx.fill_rect(x, y, w, h);
    } else {
        ctx.stroke_rect(x, y, w, h);
    }
}

/// Grass, markings, penalty areas and goal nets
pub fn field(ctx: &CanvasRenderingContext2d, camera: &Camera, sim: &MatchSim) -> Result<(), JsValue> {
    let pitch = &sim.pitch;
    ctx.set_fill_style_str(GRASS);
    rect(ctx, camera, Vec2::ZERO, Vec2::new(pitch.width, pitch.height), true);

    // Stripes run across the length of play
    ctx.set_fill_style_str(GRASS_STRIPE);
    let along = pitch.attack_dir(Side::A);
    let lateral = pitch.lateral_dir();
    let band = pitch.length() / STRIPES as f32;
    for i in (0..STRIPES).step_by(2) {
        let min = along * band * i as f32;
        let max = min + along * band + lateral * pitch.span();
        rect(ctx, camera, min, max, true);
    }

    ctx.set_stroke_style_str(LINE);
    ctx.set_line_width(camera.scale(2.0).max(1.0) as f64);
    rect(ctx, camera, Vec2::ZERO, Vec2::new(pitch.width, pitch.height), false);

    let centre = pitch.center();
    let half = along * pitch.length() / 2.0;
    line(
        ctx,
        camera.to_screen(half),
        camera.to_screen(half + lateral * pitch.span()),
    );
    circle(ctx, camera.to_screen(centre), camera.scale(60.0 * pitch.scale))?;
    ctx.stroke();

    for side in Side::BOTH {
        let area = pitch.penalty_area(side);
        rect(ctx, camera, area.min, area.max, false);

        let mouth = pitch.own_goal_center(side);
        let outward = -pitch.attack_dir(side);
        let post = lateral * pitch.goal_height / 2.0;
        let back = outward * pitch.goal_depth;
        let corners = [mouth - post, mouth + post, mouth + post + back, mouth - post + back];
        let min = corners.iter().fold(Vec2::splat(f32::MAX), |m, c| m.min(*c));
        let max = corners.iter().fold(Vec2::splat(f32::MIN), |m, c| m.max(*c));
        ctx.set_fill_style_str("rgba(255, 255, 255, 0.25)");
        rect(ctx, camera, min, max, true);
        rect(ctx, camera, min, max, false);
    }
    Ok(())
}

/// Pickups and planted traps
pub fn field_buffs(
    ctx: &CanvasRenderingContext2d,
    camera: &Camera,
    sim: &MatchSim,
    buffs: &[FieldBuff],
) -> Result<(), JsValue> {
    for buff in buffs {
        let at = camera.to_screen(buff.pos);
        let radius = camera.scale(buff.radius);
        match buff.trap.map(|t| t.kind) {
            Some(TrapKind::DeadZone) => {
                ctx.set_fill_style_str("rgba(127, 29, 29, 0.55)");
                circle(ctx, at, radius)?;
                ctx.fill();
            }
            Some(TrapKind::SlipperyGel) => {
                ctx.set_fill_style_str("rgba(132, 204, 22, 0.3)");
                circle(ctx, at, radius)?;
                ctx.fill();
            }
            None => {
                let def = sim.catalog.get(&buff.key);
                ctx.set_fill_style_str(def.map_or("#ffffff", |d| d.color.as_str()));
                circle(ctx, at, radius)?;
                ctx.fill();
                ctx.set_stroke_style_str("#ffffff");
                ctx.stroke();
                if let Some(def) = def {
                    ctx.set_fill_style_str("#000000");
                    ctx.set_font(&format!("{}px sans-serif", (radius * 1.2).round().max(8.0)));
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                    ctx.fill_text(&def.symbol, at.x as f64, at.y as f64)?;
                }
            }
        }
    }
    Ok(())
}

fn body_colors(sim: &MatchSim, body: &Body) -> (String, String) {
    match body.side() {
        Some(side) => {
            let team = &sim.teams[side.index()];
            (team.primary().to_css(), team.secondary().to_css())
        }
        None => ("#ffffff".to_string(), "#111111".to_string()),
    }
}

/// Players and the ball. Invisible bodies are skipped entirely.
pub fn bodies(ctx: &CanvasRenderingContext2d, camera: &Camera, sim: &MatchSim, bodies: &[Body]) -> Result<(), JsValue> {
    let comeback = soccer_core::comeback_side(&sim.score);
    for body in bodies.iter().filter(|b| !b.flags.invisible) {
        let at = camera.to_screen(body.pos);
        let radius = camera.scale(body.radius());
        let (fill, edge) = body_colors(sim, body);

        ctx.set_global_alpha(if body.flags.ghost { 0.45 } else { 1.0 });
        if body.side().is_some() && body.side() == comeback {
            ctx.set_fill_style_str("rgba(250, 204, 21, 0.35)");
            circle(ctx, at, radius * 1.35)?;
            ctx.fill();
        }

        ctx.set_fill_style_str(&fill);
        circle(ctx, at, radius)?;
        ctx.fill();
        ctx.set_stroke_style_str(&edge);
        ctx.set_line_width(if body.is_goalie() { 4.0 } else { 2.0 });
        ctx.stroke();

        if body.flags.frozen {
            ctx.set_stroke_style_str("#7dd3fc");
            circle(ctx, at, radius + 3.0)?;
            ctx.stroke();
        }
        if body.flags.confused || body.flags.blinded {
            ctx.set_fill_style_str("#fde047");
            ctx.set_font(&format!("{}px sans-serif", (radius * 0.9).round().max(8.0)));
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            let mark = if body.flags.blinded { "?" } else { "@" };
            ctx.fill_text(mark, at.x as f64, (at.y - radius * 1.4) as f64)?;
        }
        if let BodyId::Outfield(_, slot) = body.id {
            ctx.set_fill_style_str(&edge);
            ctx.set_font(&format!("bold {}px sans-serif", (radius * 0.8).round().max(8.0)));
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.fill_text(&(slot + 2).to_string(), at.x as f64, at.y as f64)?;
        }
    }
    ctx.set_global_alpha(1.0);
    Ok(())
}

pub fn particles(ctx: &CanvasRenderingContext2d, camera: &Camera, particles: &[Particle]) -> Result<(), JsValue> {
    for particle in particles {
        ctx.set_global_alpha(particle.alpha() as f64);
        ctx.set_fill_style_str(&particle.color.to_css());
        circle(ctx, camera.to_screen(particle.pos), camera.scale(particle.size))?;
        ctx.fill();
    }
    ctx.set_global_alpha(1.0);
    Ok(())
}

fn banner(ctx: &CanvasRenderingContext2d, width: f64, height: f64, title: &str, subtitle: Option<&str>) -> Result<(), JsValue> {
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.55)");
    ctx.fill_rect(0.0, height * 0.35, width, height * 0.3);
    ctx.set_fill_style_str("#ffffff");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("bold {}px sans-serif", (height * 0.1).round()));
    ctx.fill_text(title, width / 2.0, height * 0.47)?;
    if let Some(subtitle) = subtitle {
        ctx.set_font(&format!("{}px sans-serif", (height * 0.04).round()));
        ctx.fill_text(subtitle, width / 2.0, height * 0.58)?;
    }
    Ok(())
}

/// Countdown, goal flash, pause and tutorial overlays
pub fn overlays(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    sim: &MatchSim,
    tutorial: Option<&str>,
) -> Result<(), JsValue> {
    let board = sim.scoreboard();
    let score = format!("{} {} - {} {}", sim.teams[0].name, board.score.a, board.score.b, sim.teams[1].name);

    match board.phase {
        MatchPhase::RatingsShowcase => {
            let [a, b] = &sim.teams;
            let line = format!(
                "{} ATK {:.0} DEF {:.0}  |  {} ATK {:.0} DEF {:.0}",
                a.name, a.ratings.attack, a.ratings.defense, b.name, b.ratings.attack, b.ratings.defense
            );
            return banner(ctx, width, height, "Ratings", Some(&line));
        }
        MatchPhase::Countdown => return banner(ctx, width, height, &board.countdown.to_string(), None),
        MatchPhase::HalfTime => return banner(ctx, width, height, "Half Time", Some(&score)),
        MatchPhase::FullTime => return banner(ctx, width, height, "Full Time", Some(&score)),
        _ => {}
    }

    if board.celebrating {
        ctx.set_fill_style_str("rgba(255, 255, 255, 0.12)");
        ctx.fill_rect(0.0, 0.0, width, height);
        banner(ctx, width, height, "GOAL!", Some(&score))?;
    } else if let Some(text) = tutorial.filter(|_| board.tutorial) {
        banner(ctx, width, height, "New power-up", Some(text))?;
    } else if board.paused {
        banner(ctx, width, height, "Paused", None)?;
    }

    ctx.set_fill_style_str("#ffffff");
    ctx.set_text_align("center");
    ctx.set_text_baseline("top");
    ctx.set_font(&format!("bold {}px sans-serif", (height * 0.035).round().max(10.0)));
    let clock = if board.sudden_death {
        format!("{}  {} +", score, board.clock)
    } else {
        format!("{}  {}", score, board.clock)
    };
    ctx.fill_text(&clock, width / 2.0, 6.0)
}
