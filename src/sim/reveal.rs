//! Visibility and reveal
//!
//! Two independent one-shot reveals:
//! - switches owned by the sky-tender become visible whenever it is within
//!   its illumination radius (checked every tick)
//! - hidden offerings are revealed only by an illumination burst, measured
//!   from where the burst was cast
//!
//! Switch activation is also evaluated here: only the controlled actor, and
//! only on switches it owns that are already visible.

use glam::Vec2;

use super::geometry::intersects;
use super::progression;
use super::state::{Role, Solid, SolidKind, SwitchKind, WorldState};

/// Per-tick reveal pass followed by switch activation
pub fn update(world: &mut WorldState) {
    proximity_reveal(world);
    activate_switches(world);
}

/// Make hidden sky-tender switches visible when the sky-tender is close enough
pub fn proximity_reveal(world: &mut WorldState) {
    let Some(abel) = world.actor(Role::SkyTender) else {
        return;
    };
    let Some(radius) = abel.illumination_radius() else {
        return;
    };
    let origin = abel.center();

    for switch in &mut world.switches {
        if switch.visible || switch.owner != Role::SkyTender {
            continue;
        }
        if switch.rect.center().distance(origin) <= radius {
            switch.visible = true;
            log::debug!("switch {:?} revealed", switch.kind);
        }
    }
}

/// Reveal hidden offerings within `radius` of `origin`. Returns how many were revealed.
pub fn illumination_burst(world: &mut WorldState, origin: Vec2, radius: f32) -> usize {
    let mut revealed = 0;
    for offering in &mut world.collectibles {
        if !offering.hidden || offering.revealed {
            continue;
        }
        if offering.rect.center().distance(origin) <= radius {
            offering.revealed = true;
            revealed += 1;
        }
    }
    for _ in 0..revealed {
        world.say("Hidden offering revealed by light!");
    }
    revealed
}

/// Fire every visible, unfired switch the controlled actor owns and overlaps
pub fn activate_switches(world: &mut WorldState) {
    let Some(actor) = world.controlled_actor() else {
        return;
    };
    let role = actor.role();
    let bounds = actor.bounds();

    let mut fired = Vec::new();
    for switch in &mut world.switches {
        if !switch.visible || switch.activated || switch.owner != role {
            continue;
        }
        if intersects(&bounds, &switch.rect) {
            switch.activated = true;
            fired.push(switch.kind);
        }
    }

    for kind in fired {
        log::info!("{} activated switch {:?}", role.display_name(), kind);
        match kind {
            SwitchKind::Bridge { id } => {
                match world.bridges.iter().find(|b| b.id == id) {
                    Some(bridge) => {
                        let rect = bridge.rect;
                        world.solids.push(Solid::new(rect, SolidKind::Bridge));
                    }
                    None => log::warn!("level {} has no bridge {}", world.level, id),
                }
                world.say(format!("Bridge {id} activated!"));
            }
            SwitchKind::Gate => {
                progression::spawn_exit_gate(world);
                world.say("Exit gate revealed!");
            }
        }
    }
}
