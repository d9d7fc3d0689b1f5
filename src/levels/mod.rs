//! Level Provider contract and level descriptors
//!
//! A level is pure data: geometry, switches, offerings, bridges and a few
//! flags that drive progression. Providers hand out owned descriptors which
//! the kernel validates before it touches any world state.

mod builtin;
mod json;

pub use builtin::BuiltinLevels;
pub use json::JsonLevels;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::LevelLoadError;
use crate::sim::geometry::Rect;
use crate::sim::state::{BridgeSpec, Offerings, Role, Solid, SolidKind, SwitchKind};

/// Levels are numbered from 1
pub type LevelId = u32;

/// Source of level descriptors
pub trait LevelProvider {
    /// Number of levels; ids run `1..=level_count()`
    fn level_count(&self) -> u32;

    /// Fresh descriptor for level `id`
    fn load_level(&self, id: LevelId) -> Result<LevelDescriptor, LevelLoadError>;
}

/// Authored switch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchSpec {
    pub rect: Rect,
    pub kind: SwitchKind,
    pub owner: Role,
    /// Hidden switches are revealed by the sky-tender's presence
    #[serde(default)]
    pub visible: bool,
}

/// Authored offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleSpec {
    pub rect: Rect,
    pub owner: Role,
}

/// Top-left start position of each actor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorStarts {
    pub earth_bound: Vec2,
    pub sky_tender: Vec2,
}

impl ActorStarts {
    pub fn get(&self, role: Role) -> Vec2 {
        match role {
            Role::EarthBound => self.earth_bound,
            Role::SkyTender => self.sky_tender,
        }
    }
}

/// Elimination finale: when the actors meet, the sky-tender is removed and
/// these lines play out one narrative interval apart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Finale {
    pub lines: Vec<String>,
}

/// Everything needed to (re)build a level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDescriptor {
    pub name: String,
    /// Static solids: ground, elevated, pushable, breakable, gate-breakable
    pub solids: Vec<Solid>,
    pub switches: Vec<SwitchSpec>,
    pub collectibles: Vec<CollectibleSpec>,
    /// Sky-tender offerings that need an illumination burst first
    pub hidden_collectibles: Vec<CollectibleSpec>,
    /// Bridges raised by this level's bridge switches
    pub bridges: Vec<BridgeSpec>,
    /// Where the exit gate appears
    pub exit_gate: Rect,
    /// Gate is present from the start
    pub gate_open: bool,
    pub starts: ActorStarts,
    /// Offering counts that spawn the gate; `None` means only a gate switch does
    pub offering_thresholds: Option<Offerings>,
    /// Control cannot leave this role
    pub locked_role: Option<Role>,
    /// Control starts on this role each time the level loads, but may be switched
    pub initial_role: Option<Role>,
    /// Shown when the level is entered through a transition
    pub entry_message: Option<String>,
    pub finale: Option<Finale>,
}

fn positive(rect: &Rect) -> bool {
    rect.is_well_formed() && rect.w > 0.0 && rect.h > 0.0
}

impl LevelDescriptor {
    /// Reject descriptors that would break world invariants once loaded
    pub fn validate(&self, level: LevelId) -> Result<(), LevelLoadError> {
        let invalid = |what: String| LevelLoadError::InvalidGeometry { level, what };

        for (index, solid) in self.solids.iter().enumerate() {
            if !positive(&solid.rect) {
                return Err(invalid(format!("solid #{index}")));
            }
            match solid.kind {
                SolidKind::EphemeralEarth { .. } | SolidKind::Bridge => {
                    return Err(LevelLoadError::AuthoredDynamicSolid { level, index });
                }
                SolidKind::Breakable { health: 0 } | SolidKind::GateBreakable { health: 0 } => {
                    return Err(LevelLoadError::ZeroHealth { level, index });
                }
                _ => {}
            }
        }

        for (index, switch) in self.switches.iter().enumerate() {
            if !positive(&switch.rect) {
                return Err(invalid(format!("switch #{index}")));
            }
            if let SwitchKind::Bridge { id } = switch.kind {
                if !self.bridges.iter().any(|b| b.id == id) {
                    return Err(LevelLoadError::MissingBridge { level, bridge: id });
                }
            }
            if !switch.visible && switch.owner != Role::SkyTender {
                return Err(LevelLoadError::UnrevealableSwitch { level, index });
            }
        }

        let offerings = self.collectibles.iter().chain(&self.hidden_collectibles);
        for (index, offering) in offerings.enumerate() {
            if !positive(&offering.rect) {
                return Err(invalid(format!("offering #{index}")));
            }
        }
        for bridge in &self.bridges {
            if !positive(&bridge.rect) {
                return Err(invalid(format!("bridge {}", bridge.id)));
            }
        }
        if !positive(&self.exit_gate) {
            return Err(invalid("exit gate".to_string()));
        }
        if !self.starts.earth_bound.is_finite() || !self.starts.sky_tender.is_finite() {
            return Err(invalid("actor starts".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> LevelDescriptor {
        LevelDescriptor {
            name: "Test".to_string(),
            solids: vec![Solid::new(Rect::new(0.0, 550.0, 1200.0, 50.0), SolidKind::Ground)],
            exit_gate: Rect::new(1100.0, 470.0, 50.0, 80.0),
            ..LevelDescriptor::default()
        }
    }

    #[test]
    fn test_minimal_descriptor_is_valid() {
        assert!(minimal().validate(1).is_ok());
    }

    #[test]
    fn test_rejects_authored_bridge() {
        let mut level = minimal();
        level
            .solids
            .push(Solid::new(Rect::new(0.0, 0.0, 10.0, 10.0), SolidKind::Bridge));
        assert!(matches!(
            level.validate(2),
            Err(LevelLoadError::AuthoredDynamicSolid { level: 2, index: 1 })
        ));
    }

    #[test]
    fn test_rejects_zero_health() {
        let mut level = minimal();
        level.solids.push(Solid::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            SolidKind::GateBreakable { health: 0 },
        ));
        assert!(matches!(level.validate(1), Err(LevelLoadError::ZeroHealth { index: 1, .. })));
    }

    #[test]
    fn test_rejects_missing_bridge() {
        let mut level = minimal();
        level.switches.push(SwitchSpec {
            rect: Rect::new(10.0, 10.0, 25.0, 25.0),
            kind: SwitchKind::Bridge { id: 7 },
            owner: Role::SkyTender,
            visible: false,
        });
        assert!(matches!(
            level.validate(1),
            Err(LevelLoadError::MissingBridge { bridge: 7, .. })
        ));
    }

    #[test]
    fn test_rejects_hidden_earth_bound_switch() {
        let mut level = minimal();
        level.switches.push(SwitchSpec {
            rect: Rect::new(10.0, 10.0, 25.0, 25.0),
            kind: SwitchKind::Gate,
            owner: Role::EarthBound,
            visible: false,
        });
        assert!(matches!(
            level.validate(1),
            Err(LevelLoadError::UnrevealableSwitch { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_degenerate_geometry() {
        let mut level = minimal();
        level.exit_gate = Rect::new(0.0, 0.0, 0.0, 80.0);
        assert!(matches!(level.validate(1), Err(LevelLoadError::InvalidGeometry { .. })));

        let mut level = minimal();
        level.solids[0].rect.w = f32::NAN;
        assert!(matches!(level.validate(1), Err(LevelLoadError::InvalidGeometry { .. })));
    }
}
