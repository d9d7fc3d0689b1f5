//! Data-driven game balance
//!
//! Every physics and ability constant lives here so levels can be tuned
//! without touching the kernel. Defaults reproduce the shipped feel.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MESSAGE_MS, WORLD_HEIGHT, WORLD_WIDTH, ms_to_ticks};
use crate::error::TuningError;

/// Earth-bound role: heavy, slow, shapes the terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarthBoundTuning {
    pub size: Vec2,
    /// Horizontal speed while a move control is held
    pub speed: f32,
    pub jump_impulse: f32,
    /// Displacement applied to a pushable per tick of pushing
    pub push_power: f32,
    pub platform_size: Vec2,
    pub platform_lifetime: u32,
    pub platform_cooldown: u32,
    /// Break probe, centered on the actor
    pub break_probe: Vec2,
    pub break_cooldown: u32,
}

impl Default for EarthBoundTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(30.0, 40.0),
            speed: 1.5,
            jump_impulse: -8.0,
            push_power: 3.0,
            platform_size: Vec2::new(40.0, 10.0),
            platform_lifetime: 300,
            platform_cooldown: 120,
            break_probe: Vec2::new(50.0, 50.0),
            break_cooldown: 60,
        }
    }
}

/// Sky-tender role: light, multi-jumping, carries the light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyTenderTuning {
    pub size: Vec2,
    pub speed: f32,
    pub ground_jump_impulse: f32,
    pub air_jump_impulse: f32,
    /// Total jumps before landing, ground jump included
    pub max_jumps: u32,
    pub illumination_radius: f32,
    pub illumination_lifetime: u32,
    pub illumination_cooldown: u32,
}

impl Default for SkyTenderTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(25.0, 35.0),
            speed: 3.0,
            ground_jump_impulse: -12.0,
            air_jump_impulse: -10.0,
            max_jumps: 2,
            illumination_radius: 600.0,
            illumination_lifetime: 180,
            illumination_cooldown: 180,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world_width: f32,
    pub world_height: f32,
    /// Downward acceleration (units/tick²)
    pub gravity: f32,
    /// Horizontal velocity multiplier applied when no move input is held
    pub friction: f32,
    /// Sky-tender falling velocity multiplier (always-on glide)
    pub glide_damping: f32,
    pub earth_bound: EarthBoundTuning,
    pub sky_tender: SkyTenderTuning,
    /// Both actors must be within this distance of the gate on each axis
    pub gate_band: f32,
    /// Tolerance for "touching" checks (standing support, push contact)
    pub contact_slop: f32,
    pub level_transition_ms: u32,
    pub narrative_message_ms: u32,
    pub message_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            gravity: 0.5,
            friction: 0.85,
            glide_damping: 0.3,
            earth_bound: EarthBoundTuning::default(),
            sky_tender: SkyTenderTuning::default(),
            gate_band: 80.0,
            contact_slop: 1.0,
            level_transition_ms: 2000,
            narrative_message_ms: 5000,
            message_ms: DEFAULT_MESSAGE_MS,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the kernel cannot simulate sensibly
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }
        fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be non-negative, got {value}"),
                })
            }
        }
        fn unit(field: &'static str, value: f32) -> Result<(), TuningError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be within [0, 1], got {value}"),
                })
            }
        }

        positive("world_width", self.world_width)?;
        positive("world_height", self.world_height)?;
        unit("friction", self.friction)?;
        unit("glide_damping", self.glide_damping)?;
        positive("earth_bound.size.x", self.earth_bound.size.x)?;
        positive("earth_bound.size.y", self.earth_bound.size.y)?;
        positive("sky_tender.size.x", self.sky_tender.size.x)?;
        positive("sky_tender.size.y", self.sky_tender.size.y)?;
        positive("sky_tender.illumination_radius", self.sky_tender.illumination_radius)?;
        positive("gate_band", self.gate_band)?;
        // The standing probe has the slop as its height; zero never touches
        positive("contact_slop", self.contact_slop)?;
        non_negative("gravity", self.gravity)?;
        non_negative("earth_bound.speed", self.earth_bound.speed)?;
        non_negative("earth_bound.push_power", self.earth_bound.push_power)?;
        non_negative("sky_tender.speed", self.sky_tender.speed)?;
        if self.sky_tender.max_jumps == 0 {
            return Err(TuningError::Invalid {
                field: "sky_tender.max_jumps",
                reason: "at least the ground jump is required".to_string(),
            });
        }
        Ok(())
    }

    /// Delay between reaching the exit and the next level loading
    pub fn level_transition_ticks(&self) -> u64 {
        ms_to_ticks(self.level_transition_ms)
    }

    /// How long each narrative line stays up before the next one
    pub fn narrative_ticks(&self) -> u64 {
        ms_to_ticks(self.narrative_message_ms)
    }
}
