use hecs::{Entity, World};
use rand::seq::SliceRandom;

use crate::buffs::{ActiveBuff, BuffDef, Mechanic, Scope};
use crate::{
    Body, BodyId, BuffState, Events, FieldBuff, GameEvent, GameRng, Lifetime, Params, Sfx, Side, StepContext, Trap,
    TrapKind,
};

/// Snapshot of every player body, in id order
fn player_bodies(world: &World) -> Vec<(Entity, Body)> {
    let mut bodies: Vec<(Entity, Body)> = world
        .query::<&Body>()
        .iter()
        .filter(|(_, b)| !b.is_ball())
        .map(|(e, b)| (e, *b))
        .collect();
    bodies.sort_by_key(|(_, b)| b.id);
    bodies
}

fn write_back(world: &mut World, bodies: &[(Entity, Body)]) {
    for (entity, body) in bodies {
        if let Ok(mut slot) = world.get::<&mut Body>(*entity) {
            *slot = *body;
        }
    }
}

/// Field buffs in id order, traps included when `traps` is set
fn field_buffs(world: &World, traps: bool) -> Vec<(Entity, FieldBuff)> {
    let mut buffs: Vec<(Entity, FieldBuff)> = world
        .query::<&FieldBuff>()
        .iter()
        .filter(|(_, b)| b.trap.is_some() == traps)
        .map(|(e, b)| (e, b.clone()))
        .collect();
    buffs.sort_by_key(|(_, b)| b.id);
    buffs
}

fn touches(body: &Body, buff: &FieldBuff) -> bool {
    let reach = body.radius() + buff.radius;
    body.pos.distance_squared(buff.pos) < reach * reach
}

fn random_opponent(bodies: &[(Entity, Body)], side: Side, rng: &mut GameRng) -> Option<usize> {
    let candidates: Vec<usize> = bodies
        .iter()
        .enumerate()
        .filter(|(_, (_, b))| b.is_outfield() && b.side() == Some(side.opponent()))
        .map(|(i, _)| i)
        .collect();
    candidates.choose(&mut rng.0).copied()
}

/// Hand out field buffs to the first player touching each one
pub fn collect_buffs(world: &mut World, ctx: &StepContext, buffs: &mut BuffState, events: &mut Events, rng: &mut GameRng) {
    let pickups = field_buffs(world, false);
    if pickups.is_empty() {
        return;
    }
    let mut bodies = player_bodies(world);
    let mut picked = false;

    for (entity, field) in pickups {
        let Some(picker) = bodies.iter().position(|(_, b)| touches(b, &field)) else {
            continue;
        };
        let _ = world.despawn(entity);
        picked = true;

        let Some(def) = ctx.catalog.get(&field.key).cloned() else {
            log::warn!("picked up unknown buff {}", field.key);
            continue;
        };
        let body = bodies[picker].1;
        let Some(side) = body.side() else { continue };

        if def.permanent {
            buffs.claimed.insert(def.key.clone());
        }
        if buffs.seen.insert(def.key.clone()) {
            events.push(GameEvent::FirstBuffPickup {
                key: def.key.clone(),
                side,
            });
        }
        events.push(GameEvent::BuffPickedUp {
            key: def.key.clone(),
            side,
        });
        events.sfx(Sfx::BuffPickup);
        log::info!("{side:?} picked up {}", def.key);

        let affected = match field.mechanic.scope() {
            Scope::Team => None,
            Scope::Picker => Some(body.id),
            Scope::OpposingPlayer => match random_opponent(&bodies, side, rng) {
                Some(index) => Some(bodies[index].1.id),
                None => continue,
            },
            Scope::Instant => {
                resolve_instant(world, ctx, buffs, &mut bodies, picker, &def, field.mechanic, rng);
                continue;
            }
        };
        let id = buffs.next_id();
        buffs.active.push(ActiveBuff {
            id,
            owner: side,
            key: def.key.clone(),
            mechanic: field.mechanic,
            duration: def.duration,
            initial: def.duration,
            affected,
        });
    }

    if picked {
        write_back(world, &bodies);
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_instant(
    world: &mut World,
    ctx: &StepContext,
    buffs: &mut BuffState,
    bodies: &mut [(Entity, Body)],
    picker: usize,
    def: &BuffDef,
    mechanic: Mechanic,
    rng: &mut GameRng,
) {
    let pitch = ctx.pitch;
    let picker_body = bodies[picker].1;
    let Some(side) = picker_body.side() else { return };
    let opponent = side.opponent();

    match mechanic {
        Mechanic::SwapPlayer => {
            if let Some(target) = random_opponent(bodies, side, rng) {
                let target_pos = bodies[target].1.pos;
                bodies[target].1.pos = picker_body.pos;
                bodies[picker].1.pos = target_pos;
            }
        }
        Mechanic::PushLine => {
            let push = -pitch.attack_dir(opponent) * Params::PUSH_LINE_DISTANCE * pitch.scale;
            let bounds = pitch.bounds();
            for (_, body) in bodies.iter_mut() {
                if body.is_outfield() && body.side() == Some(opponent) {
                    body.pos = bounds.clamp_circle(body.pos + push, body.radius());
                }
            }
        }
        Mechanic::PureEnergy => {
            buffs.active.retain(|b| !(b.owner == opponent && b.mechanic.is_hostile()));
            for (_, body) in bodies.iter_mut() {
                if body.side() == Some(side) {
                    body.vel *= Params::PURE_ENERGY_BOOST;
                }
            }
        }
        Mechanic::DeadZone | Mechanic::SlipperyGel => {
            let (kind, pos, radius) = if mechanic == Mechanic::DeadZone {
                (TrapKind::DeadZone, picker_body.pos, ctx.config.player_size * pitch.scale)
            } else {
                (
                    TrapKind::SlipperyGel,
                    pitch.penalty_area(opponent).center(),
                    Params::GEL_RADIUS * pitch.scale,
                )
            };
            let id = buffs.next_id();
            world.spawn((
                FieldBuff {
                    id,
                    key: def.key.clone(),
                    mechanic,
                    pos,
                    radius,
                    trap: Some(Trap { kind, owner: side }),
                },
                Lifetime::new(def.duration),
            ));
        }
        _ => log::warn!("{mechanic:?} has no instant effect"),
    }
}

/// Spring dead-zone traps on the first opponent to step on them
pub fn trigger_traps(world: &mut World, buffs: &mut BuffState) {
    let traps = field_buffs(world, true);
    if traps.is_empty() {
        return;
    }
    let bodies = player_bodies(world);

    for (entity, field) in traps {
        let Some(trap) = field.trap.filter(|t| t.kind == TrapKind::DeadZone) else {
            continue;
        };
        let victim = bodies
            .iter()
            .map(|(_, b)| b)
            .find(|b| b.side() == Some(trap.owner.opponent()) && touches(b, &field));
        let Some(victim) = victim else { continue };

        let id = buffs.next_id();
        buffs.active.push(ActiveBuff {
            id,
            owner: trap.owner,
            key: field.key.clone(),
            mechanic: Mechanic::Freeze,
            duration: Params::TRAP_FREEZE_FRAMES,
            initial: Params::TRAP_FREEZE_FRAMES,
            affected: Some(victim.id),
        });
        log::debug!("dead zone caught {:?}", victim.id);
        let _ = world.despawn(entity);
    }
}

/// Whether `body` carries a body-scoped buff with `mechanic`
pub fn body_has(buffs: &BuffState, body: BodyId, mechanic: Mechanic) -> bool {
    buffs.find_for_body(body, |m| m == mechanic).is_some()
}
