//! Movement and role-gated abilities
//!
//! Only the controlled actor reads input. Abilities are throttled by
//! per-actor cooldowns that count down once per tick whether or not the
//! ability was used.

use glam::Vec2;

use super::geometry::Rect;
use super::reveal;
use super::state::{Abilities, IlluminatedArea, Role, Solid, SolidKind, WorldState};
use super::tick::{Control, TickInput};

/// Hand control to `role` unless the level locks it or the actor is gone
pub fn select_role(world: &mut WorldState, role: Role) {
    if world.locked_role.is_some_and(|locked| locked != role) {
        log::debug!("control locked to {:?}, ignoring switch to {:?}", world.locked_role, role);
        return;
    }
    if world.actor(role).is_none() {
        return;
    }
    if world.controlled != role {
        log::debug!("control switched to {}", role.display_name());
        world.controlled = role;
    }
}

/// Apply one tick of input to the controlled actor, then count down cooldowns
pub fn apply(world: &mut WorldState, input: &TickInput) {
    let controlled = world.controlled;
    let friction = world.tuning.friction;

    for actor in &mut world.actors {
        if actor.role() != controlled {
            actor.vel.x *= friction;
        }
    }

    if world.actor(controlled).is_some() {
        steer(world, controlled, input);
        jump(world, controlled, input);
        match controlled {
            Role::EarthBound => {
                if input.is_held(Control::Push) {
                    push(world);
                }
                if input.is_held(Control::CreatePlatform) {
                    create_platform(world);
                }
                if input.is_held(Control::Break) {
                    break_barriers(world);
                }
            }
            Role::SkyTender => {
                if input.is_held(Control::Illuminate) {
                    illuminate(world);
                }
            }
        }
    }

    for actor in &mut world.actors {
        actor.tick_cooldowns();
    }
}

fn steer(world: &mut WorldState, role: Role, input: &TickInput) {
    let speed = match role {
        Role::EarthBound => world.tuning.earth_bound.speed,
        Role::SkyTender => world.tuning.sky_tender.speed,
    };
    let friction = world.tuning.friction;
    let Some(actor) = world.actor_mut(role) else {
        return;
    };
    if input.is_held(Control::MoveLeft) {
        actor.vel.x = -speed;
        actor.facing = -1.0;
    } else if input.is_held(Control::MoveRight) {
        actor.vel.x = speed;
        actor.facing = 1.0;
    } else {
        actor.vel.x *= friction;
    }
}

/// Press-edge jump. The earth-bound actor only jumps from the ground; the
/// sky-tender gets `max_jumps - 1` weaker jumps in the air.
fn jump(world: &mut WorldState, role: Role, input: &TickInput) {
    if !input.is_press_edge(Control::Jump) {
        return;
    }
    let earth_impulse = world.tuning.earth_bound.jump_impulse;
    let ground_impulse = world.tuning.sky_tender.ground_jump_impulse;
    let air_impulse = world.tuning.sky_tender.air_jump_impulse;
    let Some(actor) = world.actor_mut(role) else {
        return;
    };
    let on_ground = actor.on_ground;
    match &mut actor.abilities {
        Abilities::EarthBound { .. } => {
            if on_ground {
                actor.vel.y = earth_impulse;
                actor.on_ground = false;
            }
        }
        Abilities::SkyTender {
            jump_count,
            max_jumps,
            ..
        } => {
            if on_ground {
                actor.vel.y = ground_impulse;
                actor.on_ground = false;
                *jump_count = 1;
            } else if *jump_count < *max_jumps {
                actor.vel.y = air_impulse;
                *jump_count += 1;
            }
        }
    }
}

/// Shove touching pushables on the facing side, kept inside the world
pub fn push(world: &mut WorldState) {
    let Some(actor) = world.actor(Role::EarthBound) else {
        return;
    };
    let Abilities::EarthBound { push_power, .. } = actor.abilities else {
        return;
    };
    let slop = world.tuning.contact_slop;
    let bounds = actor.bounds();
    let probe = Rect::new(bounds.x - slop, bounds.y, bounds.w + 2.0 * slop, bounds.h);
    let facing = actor.facing;
    let center_x = actor.center().x;
    let world_width = world.tuning.world_width;

    for solid in &mut world.solids {
        if solid.kind != SolidKind::Pushable || !probe.intersects(&solid.rect) {
            continue;
        }
        let in_front = (solid.rect.center().x - center_x) * facing > 0.0;
        if in_front {
            let max_x = (world_width - solid.rect.w).max(0.0);
            solid.rect.x = (solid.rect.x + facing * push_power).clamp(0.0, max_x);
        }
    }
}

/// Raise a short-lived earth platform under the actor's feet.
///
/// Refused while the spot overlaps a live actor; the cooldown is only spent
/// when a platform actually appears.
pub fn create_platform(world: &mut WorldState) {
    let tuning = world.tuning.earth_bound.clone();
    let Some(actor) = world.actor(Role::EarthBound) else {
        return;
    };
    let Abilities::EarthBound {
        platform_cooldown, ..
    } = actor.abilities
    else {
        return;
    };
    if platform_cooldown > 0 {
        return;
    }

    let bounds = actor.bounds();
    let rect = Rect::new(
        bounds.center().x - tuning.platform_size.x / 2.0,
        bounds.bottom(),
        tuning.platform_size.x,
        tuning.platform_size.y,
    );
    if world.actors.iter().any(|a| a.bounds().intersects(&rect)) {
        log::debug!("earth platform blocked by an actor at ({}, {})", rect.x, rect.y);
        return;
    }

    if let Some(Abilities::EarthBound {
        platform_cooldown, ..
    }) = world.actor_mut(Role::EarthBound).map(|a| &mut a.abilities)
    {
        *platform_cooldown = tuning.platform_cooldown;
    }
    world.solids.push(Solid::new(
        rect,
        SolidKind::EphemeralEarth {
            lifetime: tuning.platform_lifetime,
        },
    ));
    log::debug!("earth platform raised at ({}, {})", rect.x, rect.y);
}

/// Deal one point of damage to every breakable inside the probe around the actor
pub fn break_barriers(world: &mut WorldState) {
    let tuning = world.tuning.earth_bound.clone();
    let Some(actor) = world.actor_mut(Role::EarthBound) else {
        return;
    };
    let Abilities::EarthBound { break_cooldown, .. } = &mut actor.abilities else {
        return;
    };
    if *break_cooldown > 0 {
        return;
    }
    *break_cooldown = tuning.break_cooldown;
    let probe = Rect::centered(actor.center(), tuning.break_probe);

    let mut destroyed = Vec::new();
    for solid in &mut world.solids {
        if solid.is_breakable() && probe.intersects(&solid.rect) && solid.damage() {
            destroyed.push(solid.seals_exit());
        }
    }
    if destroyed.is_empty() {
        return;
    }

    world
        .solids
        .retain(|s| !matches!(s.kind, SolidKind::Breakable { health: 0 } | SolidKind::GateBreakable { health: 0 }));
    for seals_exit in destroyed {
        if seals_exit {
            world.say("Gate barrier destroyed!");
        } else {
            world.say("Barrier broken!");
        }
    }
}

/// Spawn a light burst on the sky-tender and reveal hidden offerings around it
pub fn illuminate(world: &mut WorldState) {
    let cooldown = world.tuning.sky_tender.illumination_cooldown;
    let lifetime = world.tuning.sky_tender.illumination_lifetime;
    let Some(actor) = world.actor_mut(Role::SkyTender) else {
        return;
    };
    let origin: Vec2 = actor.center();
    let Abilities::SkyTender {
        illumination_cooldown,
        illumination_radius,
        ..
    } = &mut actor.abilities
    else {
        return;
    };
    if *illumination_cooldown > 0 {
        return;
    }
    *illumination_cooldown = cooldown;
    let radius = *illumination_radius;

    world.illuminated.push(IlluminatedArea {
        origin,
        radius,
        lifetime,
    });
    reveal::illumination_burst(world, origin, radius);
}
