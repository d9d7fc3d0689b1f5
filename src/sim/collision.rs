//! Collision detection and response
//!
//! Actors are pushed out of every solid they overlap using the minimum
//! translation vector, one solid at a time. Each push is classified as
//! ground, ceiling or wall contact. Offering pickup also lives here since it
//! is an overlap test against the freshly resolved positions.

use super::geometry::{Axis, Rect, mtv, separate};
use super::state::{Actor, Solid, WorldState};

/// What an actor touched while being resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Pushed up out of a solid (landed on top)
    pub ground: bool,
    /// Pushed down out of a solid's underside
    pub ceiling: bool,
    /// Pushed sideways
    pub wall: bool,
    /// Resting on a solid top without overlapping it
    pub standing: bool,
}

impl Contacts {
    pub fn supported(&self) -> bool {
        self.ground || self.standing
    }
}

/// Resolve one actor against all solids and update its grounded state.
///
/// Single pass in solid order: a push out of one solid can move the actor
/// back into a solid already checked when the two are closer together than
/// the actor is tall. The next ticks work it loose. Earth platforms are
/// never raised into an actor, which keeps such gaps from forming around one.
pub fn resolve_actor(actor: &mut Actor, solids: &[Solid], slop: f32) -> Contacts {
    let mut contacts = Contacts::default();

    for solid in solids {
        let bounds = actor.bounds();
        let Some(m) = mtv(&bounds, &solid.rect) else {
            continue;
        };
        actor.set_bounds(separate(&bounds, &solid.rect, &m));
        match m.axis {
            Axis::Vertical => {
                actor.vel.y = 0.0;
                if m.is_landing() {
                    contacts.ground = true;
                } else {
                    contacts.ceiling = true;
                }
            }
            Axis::Horizontal => {
                actor.vel.x = 0.0;
                contacts.wall = true;
            }
        }
    }

    let bounds = actor.bounds();
    let feet = Rect::new(bounds.x, bounds.bottom(), bounds.w, slop);
    contacts.standing = actor.vel.y >= 0.0 && solids.iter().any(|s| feet.intersects(&s.rect));

    if contacts.supported() {
        actor.land();
    } else {
        actor.on_ground = false;
    }
    contacts
}

/// Resolve every live actor against the world's solids
pub fn resolve(world: &mut WorldState) {
    let slop = world.tuning.contact_slop;
    for actor in &mut world.actors {
        let contacts = resolve_actor(actor, &world.solids, slop);
        if contacts.wall || contacts.ceiling {
            log::trace!("{:?} contacts: {:?}", actor.role(), contacts);
        }
    }
}

/// Let each actor pick up overlapping offerings of its own role
pub fn collect_offerings(world: &mut WorldState) {
    let mut collected = Vec::new();

    for actor in &mut world.actors {
        let role = actor.role();
        let bounds = actor.bounds();
        for offering in &mut world.collectibles {
            if offering.owner != role || !offering.is_collectable() || !bounds.intersects(&offering.rect) {
                continue;
            }
            offering.collected = true;
            actor.offerings_collected += 1;
            collected.push((role, offering.hidden));
        }
    }

    for (role, hidden) in collected {
        let count = world.offerings.increment(role);
        let needed = world.thresholds.get(role);
        let text = if hidden {
            format!("Hidden offering revealed and collected! ({count}/{needed})")
        } else {
            format!("{}'s offering collected! ({count}/{needed})", role.display_name())
        };
        world.say(text);
    }
}
