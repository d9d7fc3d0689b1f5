//! Shared fixtures for simulation tests

use glam::Vec2;

use super::geometry::Rect;
use super::state::{Offerings, Solid, SolidKind, WorldState};
use crate::error::LevelLoadError;
use crate::levels::{ActorStarts, LevelDescriptor, LevelId, LevelProvider};
use crate::tuning::Tuning;

/// Top of the flat test floor
pub const GROUND_Y: f32 = 550.0;

/// Single-level provider: one full-width floor, gate on the right
pub struct FlatLevels;

impl FlatLevels {
    pub fn descriptor() -> LevelDescriptor {
        LevelDescriptor {
            name: "Flat".to_string(),
            solids: vec![Solid::new(
                Rect::new(0.0, GROUND_Y, 1200.0, 50.0),
                SolidKind::Ground,
            )],
            exit_gate: Rect::new(1100.0, 470.0, 50.0, 80.0),
            starts: ActorStarts {
                earth_bound: Vec2::new(100.0, GROUND_Y - 40.0),
                sky_tender: Vec2::new(300.0, GROUND_Y - 35.0),
            },
            offering_thresholds: Some(Offerings {
                earth_bound: 2,
                sky_tender: 3,
            }),
            ..LevelDescriptor::default()
        }
    }
}

impl LevelProvider for FlatLevels {
    fn level_count(&self) -> u32 {
        1
    }

    fn load_level(&self, id: LevelId) -> Result<LevelDescriptor, LevelLoadError> {
        match id {
            1 => Ok(Self::descriptor()),
            _ => Err(LevelLoadError::UnknownLevel { id }),
        }
    }
}

/// Flat level with both actors resting on the floor
pub fn flat_world() -> WorldState {
    let mut world = match WorldState::new(Tuning::default(), &FlatLevels) {
        Ok(world) => world,
        Err(err) => panic!("flat level must load: {err}"),
    };
    for actor in &mut world.actors {
        actor.on_ground = true;
    }
    world.drain_messages();
    world
}
