//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically. Each tick runs
//! the same fixed sequence: control handling, physics, collision, reveal,
//! progression.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, Role, WorldState};
use super::{collision, controls, physics, progression, reveal};
use crate::error::LevelLoadError;
use crate::levels::LevelProvider;

/// The fixed control set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    MoveLeft,
    MoveRight,
    Jump,
    Push,
    CreatePlatform,
    Break,
    Illuminate,
    Pause,
    Restart,
    SelectEarthBound,
    SelectSkyTender,
}

impl Control {
    pub const ALL: [Control; 11] = [
        Control::MoveLeft,
        Control::MoveRight,
        Control::Jump,
        Control::Push,
        Control::CreatePlatform,
        Control::Break,
        Control::Illuminate,
        Control::Pause,
        Control::Restart,
        Control::SelectEarthBound,
        Control::SelectSkyTender,
    ];

    #[inline]
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Compact set of controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSet(u16);

impl ControlSet {
    pub fn insert(&mut self, control: Control) {
        self.0 |= control.bit();
    }

    pub fn contains(&self, control: Control) -> bool {
        self.0 & control.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Controls in `self` that are not in `other`
    pub fn difference(&self, other: &ControlSet) -> ControlSet {
        ControlSet(self.0 & !other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Control> + '_ {
        Control::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Control> for ControlSet {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        let mut set = ControlSet::default();
        for control in iter {
            set.insert(control);
        }
        set
    }
}

/// Input commands for a single tick (already debounced)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Controls held down this tick
    pub held: ControlSet,
    /// Controls that went from released to held this tick
    pub pressed: ControlSet,
}

impl TickInput {
    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(control)
    }

    pub fn is_press_edge(&self, control: Control) -> bool {
        self.pressed.contains(control)
    }

    /// Builder: hold `control` this tick
    pub fn hold(mut self, control: Control) -> Self {
        self.held.insert(control);
        self
    }

    /// Builder: fresh press of `control` (a press is also held)
    pub fn press(mut self, control: Control) -> Self {
        self.held.insert(control);
        self.pressed.insert(control);
        self
    }
}

/// Advance the world by one fixed tick
///
/// Only level loading can fail (restart, fall-out, level transition); a
/// failed load leaves the world as it was before the load.
pub fn tick(
    world: &mut WorldState,
    input: &TickInput,
    levels: &dyn LevelProvider,
) -> Result<(), LevelLoadError> {
    if world.phase.is_terminal() {
        return Ok(());
    }

    if input.is_press_edge(Control::Restart) {
        return progression::restart_level(world, levels);
    }

    if input.is_press_edge(Control::Pause) {
        progression::toggle_pause(world);
    }
    if world.phase == GamePhase::Paused {
        return Ok(());
    }

    world.time_ticks += 1;
    progression::run_due_events(world, levels)?;

    let aftermath = progression::in_aftermath(world);
    if world.phase != GamePhase::Playing && !aftermath {
        return Ok(());
    }

    if input.is_press_edge(Control::SelectEarthBound) {
        controls::select_role(world, Role::EarthBound);
    }
    if input.is_press_edge(Control::SelectSkyTender) {
        controls::select_role(world, Role::SkyTender);
    }

    // Support is sampled before controls: a grounded actor gets no gravity this tick
    let supported: Vec<bool> = world.actors.iter().map(|a| a.on_ground).collect();
    controls::apply(world, input);

    if physics::integrate(world, &supported) {
        log::info!("actor fell out of level {}, restarting", world.level);
        return progression::restart_level(world, levels);
    }

    collision::resolve(world);
    if aftermath {
        return Ok(());
    }
    collision::collect_offerings(world);

    reveal::update(world);
    progression::evaluate(world);

    Ok(())
}
