//! Physics integrator
//!
//! Gravity, the sky-tender's glide, position integration, wall clamping and
//! the lazy lifetime sweep for ephemeral platforms and light bursts.

use super::state::{Role, SolidKind, WorldState};

/// Integrate every live actor by one tick.
///
/// `supported[i]` is whether actor `i` stood on something when the tick
/// began; supported actors get no gravity this tick. Returns true if any
/// actor dropped below the world, which calls for a level restart.
pub fn integrate(world: &mut WorldState, supported: &[bool]) -> bool {
    let gravity = world.tuning.gravity;
    let glide = world.tuning.glide_damping;
    let width = world.tuning.world_width;
    let height = world.tuning.world_height;
    let mut fell = false;

    for (i, actor) in world.actors.iter_mut().enumerate() {
        if !supported.get(i).copied().unwrap_or(false) {
            actor.vel.y += gravity;
        }
        if actor.role() == Role::SkyTender && actor.vel.y > 0.0 && !actor.on_ground {
            actor.vel.y *= glide;
        }

        actor.pos += actor.vel;
        actor.pos.x = actor.pos.x.clamp(0.0, (width - actor.size.x).max(0.0));

        if actor.pos.y > height {
            fell = true;
        }
    }

    expire_lifetimes(world);
    fell
}

/// Count down ephemeral platforms and light bursts, dropping the spent ones
pub fn expire_lifetimes(world: &mut WorldState) {
    world.solids.retain_mut(|solid| match &mut solid.kind {
        SolidKind::EphemeralEarth { lifetime } => {
            *lifetime = lifetime.saturating_sub(1);
            *lifetime > 0
        }
        _ => true,
    });
    world.illuminated.retain_mut(|area| {
        area.lifetime = area.lifetime.saturating_sub(1);
        area.lifetime > 0
    });
}
