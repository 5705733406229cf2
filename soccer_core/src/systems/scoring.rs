use glam::Vec2;

use crate::buffs::Mechanic;
use crate::{Body, BuffState, Events, GameEvent, MatchStats, Score, Sfx, Side, StatKind, StepContext};

/// Narrowed goal mouth while the attacking side holds goal shrink
const SHRUNK_GOAL: f32 = 0.6;
const GHOST_HAND_REBOUND: f32 = 2.0;
const SHIELD_REBOUND: f32 = 1.2;

/// Put the ball back in play just in front of `defender`'s line, scaling its
/// speed along the axis by `-rebound`
fn rebound(ball: &mut Body, ctx: &StepContext, defender: Side, rebound: f32) {
    let pitch = ctx.pitch;
    let radius = ball.radius();
    ball.pos = pitch.side_point(defender, radius + 5.0, pitch.across(ball.pos));
    let axis = pitch.attack_dir(Side::A);
    let along = ball.vel.dot(axis);
    ball.vel += axis * (-rebound * along - along);
}

/// Check the ball against both goal lines.
///
/// Returns the scoring side. Goals stopped by a ghost hand or a shield send
/// the ball back into play; an impact bomb in flight detonates either way and
/// its position is queued in `explosions`.
pub fn check_goal(
    ball: &mut Body,
    ctx: &StepContext,
    buffs: &mut BuffState,
    events: &mut Events,
    explosions: &mut Vec<Vec2>,
) -> Option<Side> {
    let pitch = ctx.pitch;
    let radius = ball.radius();

    for defender in Side::BOTH {
        let attacker = defender.opponent();
        let mut goal_height = pitch.goal_height;
        if buffs.team_has(Mechanic::GoalShrink, attacker) {
            goal_height *= SHRUNK_GOAL;
        }
        if pitch.depth_from_goal(defender, ball.pos) - radius >= 0.0 || !pitch.within_goal_mouth(ball.pos, goal_height) {
            continue;
        }

        if buffs
            .ball_effect
            .as_ref()
            .is_some_and(|e| e.mechanic == Mechanic::ImpactBomb)
        {
            explosions.push(ball.pos);
            buffs.ball_effect = None;
        }

        let ghost_hand = buffs
            .active
            .iter()
            .find(|b| b.mechanic == Mechanic::GhostHand && b.owner == defender && b.affected.is_none())
            .map(|b| b.id);
        if let Some(id) = ghost_hand {
            buffs.remove(id);
            rebound(ball, ctx, defender, GHOST_HAND_REBOUND);
            events.sfx(Sfx::WallHit);
            log::info!("ghost hand stopped a goal for {defender:?}");
            return None;
        }

        if buffs.team_has(Mechanic::GoalShield, defender) {
            let bounciness = ball.bounciness;
            rebound(ball, ctx, defender, SHIELD_REBOUND * bounciness);
            events.sfx(Sfx::WallHit);
            return None;
        }

        return Some(attacker);
    }
    None
}

/// Credit a goal to `side`; every goal also counts as a shot on target
pub fn award_goal(score: &mut Score, stats: &mut MatchStats, side: Side, events: &mut Events) {
    score.increment(side);
    stats.get_mut(side).shots_on_target += 1;
    events.stat(side, StatKind::ShotOnTarget);
    events.push(GameEvent::GoalScored { side });
    events.sfx(Sfx::Goal);
    events.sfx(Sfx::GoalCheer);
    log::info!("goal for {side:?}, score {}-{}", score.a, score.b);
}
