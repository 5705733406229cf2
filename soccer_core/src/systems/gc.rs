use hecs::World;

use crate::{Lifetime, Time};

/// Garbage collection: count down lifetimes and despawn expired entities
pub fn gc(world: &mut World, time: &Time) {
    let mut to_remove = Vec::new();

    for (entity, lifetime) in world.query_mut::<&mut Lifetime>() {
        lifetime.t_left -= time.dt;
        if lifetime.is_expired() {
            to_remove.push(entity);
        }
    }

    for entity in to_remove {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldBuff, Params};

    #[test]
    fn test_lifetime_counts_down_then_despawns() {
        let mut world = World::new();
        let buff = FieldBuff {
            id: 1,
            key: "SPEED_ADVANTAGE".into(),
            mechanic: crate::buffs::Mechanic::SpeedAdvantage,
            pos: glam::Vec2::new(500.0, 300.0),
            radius: Params::BUFF_RADIUS,
            trap: None,
        };
        let e = world.spawn((buff, Lifetime::new(2.0)));
        let time = Time::new(1.0, 0.0);

        gc(&mut world, &time);
        assert!(world.contains(e));
        assert_eq!(world.get::<&Lifetime>(e).expect("lifetime").t_left, 1.0);

        gc(&mut world, &time);
        assert!(!world.contains(e), "Expired field buff is removed");
    }
}
