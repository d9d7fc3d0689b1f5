//! The shipped level set
//!
//! 1 "Puzzle Islands", 2 "Canyon Crossing", 3 "The Confrontation" and the
//! elimination finale 4 "The Final Confrontation".

use glam::Vec2;

use super::{ActorStarts, CollectibleSpec, Finale, LevelDescriptor, LevelId, LevelProvider, SwitchSpec};
use crate::consts::WORLD_WIDTH;
use crate::error::LevelLoadError;
use crate::sim::geometry::Rect;
use crate::sim::state::{BridgeSpec, Offerings, Role, Solid, SolidKind, SwitchKind};

const LEVEL_COUNT: u32 = 4;

const GATE_SIZE: Vec2 = Vec2::new(50.0, 80.0);
const SWITCH_SIZE: f32 = 25.0;
const BOX_SIZE: f32 = 35.0;
const OFFERING_SIZE: f32 = 18.0;
const HIDDEN_OFFERING_SIZE: f32 = 16.0;

/// Both standard levels gate on two earth-bound and three sky-tender offerings
const STANDARD_THRESHOLDS: Offerings = Offerings {
    earth_bound: 2,
    sky_tender: 3,
};

/// Built-in level set; descriptors are rebuilt on every load
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLevels;

impl BuiltinLevels {
    pub fn new() -> Self {
        Self
    }
}

impl LevelProvider for BuiltinLevels {
    fn level_count(&self) -> u32 {
        LEVEL_COUNT
    }

    fn load_level(&self, id: LevelId) -> Result<LevelDescriptor, LevelLoadError> {
        match id {
            1 => Ok(puzzle_islands()),
            2 => Ok(canyon_crossing()),
            3 => Ok(confrontation()),
            4 => Ok(final_confrontation()),
            _ => Err(LevelLoadError::UnknownLevel { id }),
        }
    }
}

fn solid(x: f32, y: f32, w: f32, h: f32, kind: SolidKind) -> Solid {
    Solid::new(Rect::new(x, y, w, h), kind)
}

fn pushable(x: f32, y: f32) -> Solid {
    solid(x, y, BOX_SIZE, BOX_SIZE, SolidKind::Pushable)
}

fn switch(x: f32, y: f32, kind: SwitchKind, owner: Role, visible: bool) -> SwitchSpec {
    SwitchSpec {
        rect: Rect::new(x, y, SWITCH_SIZE, SWITCH_SIZE),
        kind,
        owner,
        visible,
    }
}

/// Sky-tender bridge switch, hidden until the sky-tender comes near
fn bridge_switch(x: f32, y: f32, id: u32) -> SwitchSpec {
    switch(x, y, SwitchKind::Bridge { id }, Role::SkyTender, false)
}

fn offering(x: f32, y: f32, owner: Role) -> CollectibleSpec {
    CollectibleSpec {
        rect: Rect::new(x, y, OFFERING_SIZE, OFFERING_SIZE),
        owner,
    }
}

fn hidden_offering(x: f32, y: f32) -> CollectibleSpec {
    CollectibleSpec {
        rect: Rect::new(x, y, HIDDEN_OFFERING_SIZE, HIDDEN_OFFERING_SIZE),
        owner: Role::SkyTender,
    }
}

fn bridge(id: u32, x: f32, y: f32, w: f32, h: f32) -> BridgeSpec {
    BridgeSpec {
        id,
        rect: Rect::new(x, y, w, h),
    }
}

fn gate_at(x: f32, y: f32) -> Rect {
    Rect::from_pos_size(Vec2::new(x, y), GATE_SIZE)
}

fn puzzle_islands() -> LevelDescriptor {
    use SolidKind::*;
    LevelDescriptor {
        name: "Puzzle Islands".to_string(),
        solids: vec![
            solid(0.0, 550.0, 200.0, 50.0, Ground),
            solid(300.0, 500.0, 180.0, 50.0, Ground),
            solid(600.0, 450.0, 160.0, 50.0, Ground),
            solid(900.0, 400.0, 100.0, 50.0, Ground),
            solid(1100.0, 350.0, 100.0, 50.0, Ground),
            solid(350.0, 420.0, 80.0, 20.0, Elevated),
            solid(650.0, 370.0, 80.0, 20.0, Elevated),
            pushable(220.0, 520.0),
            pushable(550.0, 400.0),
            solid(520.0, 350.0, 25.0, 100.0, Breakable { health: 1 }),
            solid(800.0, 300.0, 25.0, 100.0, Breakable { health: 1 }),
            solid(1080.0, 300.0, 20.0, 100.0, GateBreakable { health: 2 }),
            solid(1120.0, 300.0, 20.0, 100.0, GateBreakable { health: 2 }),
        ],
        switches: vec![
            bridge_switch(380.0, 380.0, 1),
            bridge_switch(680.0, 330.0, 2),
            bridge_switch(950.0, 360.0, 3),
            switch(1150.0, 310.0, SwitchKind::Gate, Role::EarthBound, true),
        ],
        collectibles: vec![
            offering(350.0, 480.0, Role::EarthBound),
            offering(950.0, 380.0, Role::EarthBound),
            offering(650.0, 430.0, Role::SkyTender),
        ],
        hidden_collectibles: vec![hidden_offering(450.0, 480.0), hidden_offering(700.0, 380.0)],
        bridges: vec![
            bridge(1, 200.0, 500.0, 100.0, 20.0),
            bridge(2, 480.0, 450.0, 120.0, 20.0),
            bridge(3, 1000.0, 350.0, 100.0, 20.0),
        ],
        exit_gate: gate_at(1150.0, 300.0),
        gate_open: false,
        starts: ActorStarts {
            earth_bound: Vec2::new(50.0, 500.0),
            sky_tender: Vec2::new(100.0, 500.0),
        },
        offering_thresholds: Some(STANDARD_THRESHOLDS),
        locked_role: None,
        initial_role: None,
        entry_message: None,
        finale: None,
    }
}

fn canyon_crossing() -> LevelDescriptor {
    use SolidKind::*;
    LevelDescriptor {
        name: "Canyon Crossing".to_string(),
        solids: vec![
            solid(0.0, 550.0, 200.0, 50.0, Ground),
            solid(400.0, 500.0, 150.0, 50.0, Ground),
            solid(800.0, 450.0, 100.0, 50.0, Ground),
            solid(1050.0, 400.0, 150.0, 50.0, Ground),
            solid(300.0, 420.0, 80.0, 20.0, Elevated),
            solid(700.0, 370.0, 80.0, 20.0, Elevated),
            pushable(150.0, 520.0),
            pushable(500.0, 470.0),
            solid(600.0, 400.0, 25.0, 100.0, Breakable { health: 2 }),
            solid(1150.0, 300.0, 20.0, 100.0, GateBreakable { health: 3 }),
        ],
        switches: vec![
            bridge_switch(330.0, 380.0, 1),
            bridge_switch(730.0, 330.0, 2),
            bridge_switch(1100.0, 360.0, 3),
            switch(1150.0, 360.0, SwitchKind::Gate, Role::EarthBound, true),
        ],
        collectibles: vec![
            offering(80.0, 530.0, Role::EarthBound),
            offering(450.0, 480.0, Role::EarthBound),
            offering(900.0, 430.0, Role::EarthBound),
            offering(350.0, 400.0, Role::SkyTender),
        ],
        hidden_collectibles: vec![hidden_offering(1000.0, 380.0), hidden_offering(750.0, 350.0)],
        bridges: vec![
            bridge(1, 200.0, 500.0, 100.0, 20.0),
            bridge(2, 550.0, 450.0, 200.0, 20.0),
            bridge(3, 900.0, 400.0, 150.0, 20.0),
        ],
        exit_gate: gate_at(1150.0, 250.0),
        gate_open: false,
        starts: ActorStarts {
            earth_bound: Vec2::new(50.0, 500.0),
            sky_tender: Vec2::new(100.0, 500.0),
        },
        offering_thresholds: Some(STANDARD_THRESHOLDS),
        locked_role: None,
        initial_role: None,
        entry_message: None,
        finale: None,
    }
}

/// Open field with the gate already standing
fn open_field(name: &str) -> LevelDescriptor {
    LevelDescriptor {
        name: name.to_string(),
        solids: vec![solid(0.0, 550.0, WORLD_WIDTH, 50.0, SolidKind::Ground)],
        exit_gate: gate_at(1100.0, 470.0),
        gate_open: true,
        initial_role: Some(Role::EarthBound),
        starts: ActorStarts {
            earth_bound: Vec2::new(200.0, 500.0),
            sky_tender: Vec2::new(800.0, 500.0),
        },
        ..LevelDescriptor::default()
    }
}

fn confrontation() -> LevelDescriptor {
    open_field("The Confrontation")
}

fn final_confrontation() -> LevelDescriptor {
    LevelDescriptor {
        locked_role: Some(Role::EarthBound),
        entry_message: Some("\"Am I my brother's keeper?\"".to_string()),
        finale: Some(Finale {
            lines: vec![
                "Cain rose up against his brother Abel and killed him.".to_string(),
                "The Lord put a mark on Cain so that no one who found him would kill him. \
                 He was doomed to wander the earth."
                    .to_string(),
            ],
        }),
        ..open_field("The Final Confrontation")
    }
}
