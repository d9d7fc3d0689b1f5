//! World state and core simulation types
//!
//! Everything the kernel owns lives in [`WorldState`]. Subsystems receive it
//! by mutable reference once per tick; nothing is global.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::schedule::Schedule;
use crate::levels::LevelId;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Fully frozen until resumed
    Paused,
    /// Exit reached; next level loads after the transition delay
    LevelComplete,
    /// Story over, closing lines still playing
    GameComplete,
    /// Terminal: nothing updates any more
    FinalGameComplete,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        *self == GamePhase::FinalGameComplete
    }
}

/// The two fixed actor archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Cain: pushes, raises earth, breaks barriers
    EarthBound,
    /// Abel: multi-jumps, glides, illuminates
    SkyTender,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::EarthBound, Role::SkyTender];

    /// Character name used in messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::EarthBound => "Cain",
            Role::SkyTender => "Abel",
        }
    }
}

/// Role-specific ability state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Abilities {
    EarthBound {
        push_power: f32,
        platform_cooldown: u32,
        break_cooldown: u32,
    },
    SkyTender {
        jump_count: u32,
        max_jumps: u32,
        illumination_cooldown: u32,
        illumination_radius: f32,
    },
}

/// A controllable character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
    /// -1 facing left, +1 facing right
    pub facing: f32,
    pub abilities: Abilities,
    pub offerings_collected: u32,
}

impl Actor {
    /// Fresh actor for `role` at `start`, abilities ready
    pub fn new(role: Role, start: Vec2, tuning: &Tuning) -> Self {
        let (size, abilities) = match role {
            Role::EarthBound => (
                tuning.earth_bound.size,
                Abilities::EarthBound {
                    push_power: tuning.earth_bound.push_power,
                    platform_cooldown: 0,
                    break_cooldown: 0,
                },
            ),
            Role::SkyTender => (
                tuning.sky_tender.size,
                Abilities::SkyTender {
                    jump_count: 0,
                    max_jumps: tuning.sky_tender.max_jumps,
                    illumination_cooldown: 0,
                    illumination_radius: tuning.sky_tender.illumination_radius,
                },
            ),
        };
        Self {
            pos: start,
            vel: Vec2::ZERO,
            size,
            on_ground: false,
            facing: 1.0,
            abilities,
            offerings_collected: 0,
        }
    }

    pub fn role(&self) -> Role {
        match self.abilities {
            Abilities::EarthBound { .. } => Role::EarthBound,
            Abilities::SkyTender { .. } => Role::SkyTender,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn set_bounds(&mut self, rect: Rect) {
        self.pos = Vec2::new(rect.x, rect.y);
    }

    /// Touch down: grounded, jump budget restored
    pub fn land(&mut self) {
        self.on_ground = true;
        if let Abilities::SkyTender { jump_count, .. } = &mut self.abilities {
            *jump_count = 0;
        }
    }

    /// Count every ability cooldown one tick toward zero
    pub fn tick_cooldowns(&mut self) {
        match &mut self.abilities {
            Abilities::EarthBound {
                platform_cooldown,
                break_cooldown,
                ..
            } => {
                *platform_cooldown = platform_cooldown.saturating_sub(1);
                *break_cooldown = break_cooldown.saturating_sub(1);
            }
            Abilities::SkyTender {
                illumination_cooldown,
                ..
            } => {
                *illumination_cooldown = illumination_cooldown.saturating_sub(1);
            }
        }
    }

    /// Current illumination radius (sky-tender only)
    pub fn illumination_radius(&self) -> Option<f32> {
        match self.abilities {
            Abilities::SkyTender {
                illumination_radius,
                ..
            } => Some(illumination_radius),
            Abilities::EarthBound { .. } => None,
        }
    }
}

/// Solid categories; the category decides resolution and interaction rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SolidKind {
    Ground,
    Elevated,
    /// Raised by the earth-bound actor, crumbles when `lifetime` runs out
    EphemeralEarth { lifetime: u32 },
    /// Spawned by a bridge switch, permanent for the level
    Bridge,
    /// Displaced by the earth-bound push, kept inside the world
    Pushable,
    Breakable { health: u32 },
    /// Breakable that seals the exit gate
    GateBreakable { health: u32 },
}

impl SolidKind {
    /// Kinds that only ever appear at runtime
    pub fn is_dynamic(&self) -> bool {
        matches!(self, SolidKind::EphemeralEarth { .. } | SolidKind::Bridge)
    }
}

/// Collidable surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub rect: Rect,
    pub kind: SolidKind,
}

impl Solid {
    pub fn new(rect: Rect, kind: SolidKind) -> Self {
        Self { rect, kind }
    }

    /// Apply one point of damage. Returns true when this destroyed the solid.
    /// Non-breakable solids ignore damage.
    pub fn damage(&mut self) -> bool {
        match &mut self.kind {
            SolidKind::Breakable { health } | SolidKind::GateBreakable { health } => {
                *health = health.saturating_sub(1);
                *health == 0
            }
            _ => false,
        }
    }

    pub fn is_breakable(&self) -> bool {
        matches!(
            self.kind,
            SolidKind::Breakable { .. } | SolidKind::GateBreakable { .. }
        )
    }

    pub fn seals_exit(&self) -> bool {
        matches!(self.kind, SolidKind::GateBreakable { .. })
    }
}

/// What a switch does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwitchKind {
    /// Append the level's bridge with this id
    Bridge { id: u32 },
    /// Spawn the exit gate
    Gate,
}

/// One-shot trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    pub rect: Rect,
    pub kind: SwitchKind,
    /// Only this role may activate it
    pub owner: Role,
    pub visible: bool,
    pub activated: bool,
}

/// An offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub rect: Rect,
    pub owner: Role,
    /// Hidden offerings need an illumination burst before they count
    pub hidden: bool,
    pub revealed: bool,
    pub collected: bool,
}

impl Collectible {
    pub fn is_visible(&self) -> bool {
        !self.hidden || self.revealed
    }

    pub fn is_collectable(&self) -> bool {
        !self.collected && self.is_visible()
    }
}

/// Light burst left behind by an illuminate action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlluminatedArea {
    pub origin: Vec2,
    pub radius: f32,
    pub lifetime: u32,
}

/// The level exit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitGate {
    pub rect: Rect,
}

/// Per-role offering counts (also used for thresholds)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offerings {
    pub earth_bound: u32,
    pub sky_tender: u32,
}

impl Offerings {
    pub fn get(&self, role: Role) -> u32 {
        match role {
            Role::EarthBound => self.earth_bound,
            Role::SkyTender => self.sky_tender,
        }
    }

    pub fn increment(&mut self, role: Role) -> u32 {
        let count = match role {
            Role::EarthBound => &mut self.earth_bound,
            Role::SkyTender => &mut self.sky_tender,
        };
        *count += 1;
        *count
    }

    /// Every role has reached its count in `thresholds`
    pub fn meets(&self, thresholds: &Offerings) -> bool {
        Role::ALL.iter().all(|r| self.get(*r) >= thresholds.get(*r))
    }
}

/// Human-readable event for the messaging sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub duration_ms: u32,
}

/// A bridge a switch can raise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BridgeSpec {
    pub id: u32,
    pub rect: Rect,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub tuning: Tuning,
    pub level: LevelId,
    pub level_name: String,
    /// No level follows this one
    pub is_last_level: bool,
    /// Elimination finale armed for this level
    pub finale: bool,
    pub phase: GamePhase,
    /// Simulation tick counter (advances on every live tick)
    pub time_ticks: u64,
    /// Staleness token; bumped on every level load or restart
    pub epoch: u32,
    /// Role receiving movement and ability input
    pub controlled: Role,
    /// When set, control cannot leave this role
    pub locked_role: Option<Role>,
    /// Live actors; an eliminated actor is removed for good
    pub actors: Vec<Actor>,
    pub solids: Vec<Solid>,
    pub switches: Vec<Switch>,
    pub collectibles: Vec<Collectible>,
    pub illuminated: Vec<IlluminatedArea>,
    /// Bridges this level's switches can raise
    pub bridges: Vec<BridgeSpec>,
    /// Where the exit gate appears once spawned
    pub exit_gate_at: Rect,
    pub exit_gate: Option<ExitGate>,
    pub exit_gate_spawned: bool,
    pub offerings: Offerings,
    pub thresholds: Offerings,
    /// Gate spawns itself once `thresholds` are met
    pub gate_by_offerings: bool,
    /// Closing lines played after the finale elimination
    pub finale_lines: Vec<String>,
    pub schedule: Schedule,
    /// Outbox for the messaging sink
    #[serde(skip)]
    pub messages: Vec<Message>,
}

impl WorldState {
    /// Empty world with no level content; call `progression::load_level` to populate it
    pub fn empty(tuning: Tuning) -> Self {
        Self {
            tuning,
            level: 0,
            level_name: String::new(),
            is_last_level: false,
            finale: false,
            phase: GamePhase::Playing,
            time_ticks: 0,
            epoch: 0,
            controlled: Role::EarthBound,
            locked_role: None,
            actors: Vec::new(),
            solids: Vec::new(),
            switches: Vec::new(),
            collectibles: Vec::new(),
            illuminated: Vec::new(),
            bridges: Vec::new(),
            exit_gate_at: Rect::default(),
            exit_gate: None,
            exit_gate_spawned: false,
            offerings: Offerings::default(),
            thresholds: Offerings::default(),
            gate_by_offerings: false,
            finale_lines: Vec::new(),
            schedule: Schedule::default(),
            messages: Vec::new(),
        }
    }

    pub fn actor(&self, role: Role) -> Option<&Actor> {
        self.actors.iter().find(|a| a.role() == role)
    }

    pub fn actor_mut(&mut self, role: Role) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.role() == role)
    }

    pub fn controlled_actor(&self) -> Option<&Actor> {
        self.actor(self.controlled)
    }

    /// Queue a message with the default duration
    pub fn say(&mut self, text: impl Into<String>) {
        let duration_ms = self.tuning.message_ms;
        self.say_for(text, duration_ms);
    }

    pub fn say_for(&mut self, text: impl Into<String>, duration_ms: u32) {
        let text = text.into();
        log::debug!("message: {}", text);
        self.messages.push(Message { text, duration_ms });
    }

    /// Hand queued messages to the caller
    pub fn drain_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    /// Gate-breakable solids still sealing the exit
    pub fn gate_seals_remaining(&self) -> usize {
        self.solids.iter().filter(|s| s.seals_exit()).count()
    }
}
