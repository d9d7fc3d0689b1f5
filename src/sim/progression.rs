//! Level and game progression
//!
//! Owns the phase state machine:
//!
//! ```text
//! Playing <-> Paused
//! Playing -> LevelComplete -> Playing (next level) | GameComplete (last level)
//! Playing -> GameComplete -> FinalGameComplete   (elimination finale)
//! ```
//!
//! Level loading, restart, exit-gate spawning and the scheduled-event poll
//! live here as well.

use glam::Vec2;

use super::schedule::{Deferred, ScheduledEvent};
use super::state::{
    Actor, Collectible, ExitGate, GamePhase, Offerings, Role, Switch, WorldState,
};
use crate::error::LevelLoadError;
use crate::levels::{LevelDescriptor, LevelId, LevelProvider};
use crate::tuning::Tuning;

/// Id of the first level every provider starts from
pub const FIRST_LEVEL: LevelId = 1;

/// Shown when the last level's exit is reached
const CLOSING_LINE: &str = "The Lord said to Cain, \"Where is your brother Abel?\"";

impl WorldState {
    /// New game on the provider's first level
    pub fn new(tuning: Tuning, levels: &dyn LevelProvider) -> Result<Self, LevelLoadError> {
        let mut world = WorldState::empty(tuning);
        load_level(&mut world, levels, FIRST_LEVEL)?;
        Ok(world)
    }
}

/// Replace the world's level content with level `id` and announce it.
///
/// The descriptor is fetched and validated before anything is touched, so
/// a failure leaves the world exactly as it was.
pub fn load_level(
    world: &mut WorldState,
    levels: &dyn LevelProvider,
    id: LevelId,
) -> Result<(), LevelLoadError> {
    enter_level(world, levels, id, true)
}

fn enter_level(
    world: &mut WorldState,
    levels: &dyn LevelProvider,
    id: LevelId,
    announce: bool,
) -> Result<(), LevelLoadError> {
    let count = levels.level_count();
    if count == 0 {
        return Err(LevelLoadError::Empty);
    }
    let descriptor = match levels.load_level(id).and_then(|d| d.validate(id).map(|_| d)) {
        Ok(descriptor) => descriptor,
        Err(err) => {
            log::warn!("level {} failed to load: {}", id, err);
            return Err(err);
        }
    };
    apply_level(world, id, id >= count, descriptor, announce);
    Ok(())
}

fn apply_level(
    world: &mut WorldState,
    id: LevelId,
    is_last: bool,
    level: LevelDescriptor,
    announce: bool,
) {
    let tuning = &world.tuning;
    let actors = Role::ALL
        .iter()
        .map(|role| Actor::new(*role, level.starts.get(*role), tuning))
        .collect();

    world.level = id;
    world.level_name = level.name;
    world.is_last_level = is_last;
    world.finale = level.finale.is_some();
    world.phase = GamePhase::Playing;
    world.epoch = world.epoch.wrapping_add(1);
    world.locked_role = level.locked_role;
    if let Some(role) = level.locked_role.or(level.initial_role) {
        world.controlled = role;
    }
    world.actors = actors;
    world.solids = level.solids;
    world.switches = level
        .switches
        .into_iter()
        .map(|s| Switch {
            rect: s.rect,
            kind: s.kind,
            owner: s.owner,
            visible: s.visible,
            activated: false,
        })
        .collect();
    let visible = level.collectibles.into_iter().map(|c| (c, false));
    let hidden = level.hidden_collectibles.into_iter().map(|c| (c, true));
    world.collectibles = visible
        .chain(hidden)
        .map(|(c, hidden)| Collectible {
            rect: c.rect,
            owner: c.owner,
            hidden,
            revealed: false,
            collected: false,
        })
        .collect();
    world.illuminated.clear();
    world.bridges = level.bridges;
    world.exit_gate_at = level.exit_gate;
    world.exit_gate = None;
    world.exit_gate_spawned = false;
    world.offerings = Offerings::default();
    world.thresholds = level.offering_thresholds.unwrap_or_default();
    world.gate_by_offerings = level.offering_thresholds.is_some();
    world.finale_lines = level.finale.map(|f| f.lines).unwrap_or_default();

    if level.gate_open {
        world.exit_gate = Some(ExitGate {
            rect: world.exit_gate_at,
        });
        world.exit_gate_spawned = true;
    }

    log::info!(
        "loaded level {} \"{}\": {} solids, {} switches, {} offerings",
        id,
        world.level_name,
        world.solids.len(),
        world.switches.len(),
        world.collectibles.len()
    );

    if let Some(text) = level.entry_message.filter(|_| announce) {
        world.say(text);
    }
}

/// Reload the current level from scratch (explicit restart or fall-out)
pub fn restart_level(world: &mut WorldState, levels: &dyn LevelProvider) -> Result<(), LevelLoadError> {
    if world.phase.is_terminal() {
        return Ok(());
    }
    let level = world.level;
    enter_level(world, levels, level, false)?;
    world.say("Level Restarted");
    Ok(())
}

pub fn toggle_pause(world: &mut WorldState) {
    match world.phase {
        GamePhase::Playing => {
            world.phase = GamePhase::Paused;
            world.say("Game Paused");
        }
        GamePhase::Paused => {
            world.phase = GamePhase::Playing;
            world.say("Game Resumed");
        }
        _ => {}
    }
}

/// Spawn the exit gate once; later calls are no-ops. Returns true if it spawned now.
pub fn spawn_exit_gate(world: &mut WorldState) -> bool {
    if world.exit_gate_spawned {
        return false;
    }
    world.exit_gate_spawned = true;
    world.exit_gate = Some(ExitGate {
        rect: world.exit_gate_at,
    });
    log::info!("exit gate spawned on level {}", world.level);
    world.say("Exit gate has appeared! Break the barriers to access it!");
    true
}

/// The elimination finale has played; the survivor may still walk around
pub fn in_aftermath(world: &WorldState) -> bool {
    world.phase == GamePhase::GameComplete && world.finale && world.actor(Role::SkyTender).is_none()
}

/// End-of-tick progression checks
pub fn evaluate(world: &mut WorldState) {
    if world.phase != GamePhase::Playing {
        return;
    }

    if world.gate_by_offerings && !world.exit_gate_spawned && world.offerings.meets(&world.thresholds) {
        spawn_exit_gate(world);
    }

    if world.finale && brothers_meet(world) {
        eliminate(world);
        return;
    }

    if exit_reached(world) {
        complete_level(world);
    }
}

fn brothers_meet(world: &WorldState) -> bool {
    match (world.actor(Role::EarthBound), world.actor(Role::SkyTender)) {
        (Some(cain), Some(abel)) => cain.bounds().intersects(&abel.bounds()),
        _ => false,
    }
}

/// Both actors inside the gate's proximity band and no gate seal left standing
fn exit_reached(world: &WorldState) -> bool {
    let Some(gate) = &world.exit_gate else {
        return false;
    };
    if world.gate_seals_remaining() > 0 {
        return false;
    }
    let band = world.tuning.gate_band;
    let gate_center = gate.rect.center();
    let near = |role: Role| {
        world.actor(role).is_some_and(|a| {
            let d: Vec2 = a.center() - gate_center;
            d.x.abs() < band && d.y.abs() < band
        })
    };
    near(Role::EarthBound) && near(Role::SkyTender)
}

fn complete_level(world: &mut WorldState) {
    world.phase = GamePhase::LevelComplete;
    log::info!("level {} complete", world.level);
    if world.is_last_level {
        world.say(format!("Level {} Complete!", world.level));
    } else {
        world.say(format!(
            "Level {} Complete! Proceeding to Level {}",
            world.level,
            world.level + 1
        ));
    }
    let fire_at = world.time_ticks + world.tuning.level_transition_ticks();
    world.schedule.push(ScheduledEvent {
        fire_at,
        epoch: world.epoch,
        phase: GamePhase::LevelComplete,
        action: Deferred::AdvanceLevel,
    });
}

/// Elimination finale: the sky-tender is gone for good, the closing lines
/// play out, then the game freezes
fn eliminate(world: &mut WorldState) {
    world.phase = GamePhase::GameComplete;
    world.actors.retain(|a| a.role() != Role::SkyTender);
    world.controlled = Role::EarthBound;
    log::info!("finale reached on level {}", world.level);

    let duration = world.tuning.narrative_message_ms;
    let step = world.tuning.narrative_ticks();
    let mut lines = world.finale_lines.clone().into_iter();
    if let Some(first) = lines.next() {
        world.say_for(first, duration);
    }
    let mut fire_at = world.time_ticks;
    for text in lines {
        fire_at += step;
        world.schedule.push(ScheduledEvent {
            fire_at,
            epoch: world.epoch,
            phase: GamePhase::GameComplete,
            action: Deferred::Narrate { text },
        });
    }
    world.schedule.push(ScheduledEvent {
        fire_at: fire_at + step,
        epoch: world.epoch,
        phase: GamePhase::GameComplete,
        action: Deferred::Finish,
    });
}

/// Apply scheduled events that have come due, dropping stale ones
pub fn run_due_events(world: &mut WorldState, levels: &dyn LevelProvider) -> Result<(), LevelLoadError> {
    for event in world.schedule.take_due(world.time_ticks) {
        if event.is_stale(world.epoch, world.phase) {
            log::debug!(
                "dropping stale {:?} (epoch {} vs {}, phase {:?} vs {:?})",
                event.action,
                event.epoch,
                world.epoch,
                event.phase,
                world.phase
            );
            continue;
        }
        match event.action {
            Deferred::AdvanceLevel => {
                if world.is_last_level {
                    world.phase = GamePhase::GameComplete;
                    log::info!("game complete");
                    world.say(CLOSING_LINE);
                } else {
                    let next = world.level + 1;
                    load_level(world, levels, next)?;
                }
            }
            Deferred::Narrate { text } => {
                let duration = world.tuning.narrative_message_ms;
                world.say_for(text, duration);
            }
            Deferred::Finish => {
                log::info!("final game complete");
                world.phase = GamePhase::FinalGameComplete;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::BuiltinLevels;
    use crate::sim::controls::select_role;
    use crate::sim::geometry::Rect;
    use crate::sim::state::{Solid, SolidKind};
    use crate::sim::test_support::{flat_world, FlatLevels};
    use crate::sim::tick::{tick, Control, TickInput};

    fn idle(world: &mut WorldState, levels: &dyn LevelProvider, ticks: usize) {
        for _ in 0..ticks {
            tick(world, &TickInput::default(), levels).expect("tick");
        }
    }

    /// Put both actors on the gate
    fn gather_at_gate(world: &mut WorldState) {
        let gate = world.exit_gate.as_ref().expect("gate").rect;
        for actor in &mut world.actors {
            actor.pos = gate.center() - actor.size / 2.0;
            actor.vel = Vec2::ZERO;
        }
    }

    fn offering_on(actor: Rect, dx: f32, owner: Role) -> Collectible {
        Collectible {
            rect: Rect::new(actor.x + dx, actor.bottom() - 18.0, 18.0, 18.0),
            owner,
            hidden: false,
            revealed: false,
            collected: false,
        }
    }

    #[test]
    fn test_collected_offerings_spawn_gate() {
        let levels = FlatLevels;
        let mut world = flat_world();
        let cain = world.actor(Role::EarthBound).expect("cain").bounds();
        let abel = world.actor(Role::SkyTender).expect("abel").bounds();
        for dx in [0.0, 10.0] {
            world.collectibles.push(offering_on(cain, dx, Role::EarthBound));
        }
        for dx in [0.0, 3.0, 6.0] {
            world.collectibles.push(offering_on(abel, dx, Role::SkyTender));
        }
        assert!(!world.exit_gate_spawned);

        tick(&mut world, &TickInput::default(), &levels).expect("tick");
        assert_eq!(
            world.offerings,
            Offerings {
                earth_bound: 2,
                sky_tender: 3,
            }
        );
        assert!(world.exit_gate_spawned);
        assert!(world.exit_gate.is_some());
    }

    #[test]
    fn test_short_of_thresholds_keeps_gate_closed() {
        let levels = FlatLevels;
        let mut world = flat_world();
        let cain = world.actor(Role::EarthBound).expect("cain").bounds();
        let abel = world.actor(Role::SkyTender).expect("abel").bounds();
        world.collectibles.push(offering_on(cain, 0.0, Role::EarthBound));
        world.collectibles.push(offering_on(cain, 10.0, Role::EarthBound));
        world.collectibles.push(offering_on(abel, 0.0, Role::SkyTender));
        tick(&mut world, &TickInput::default(), &levels).expect("tick");
        assert!(!world.exit_gate_spawned);
    }

    #[test]
    fn test_spawn_exit_gate_is_idempotent() {
        let mut world = flat_world();
        assert!(spawn_exit_gate(&mut world));
        assert!(!spawn_exit_gate(&mut world));
        let spawned = world
            .drain_messages()
            .iter()
            .filter(|m| m.text.starts_with("Exit gate has appeared"))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn test_gate_seals_block_completion() {
        let levels = FlatLevels;
        let mut world = flat_world();
        spawn_exit_gate(&mut world);
        world.solids.push(Solid::new(
            Rect::new(10.0, 10.0, 20.0, 20.0),
            SolidKind::GateBreakable { health: 2 },
        ));
        gather_at_gate(&mut world);
        tick(&mut world, &TickInput::default(), &levels).expect("tick");
        assert_eq!(world.phase, GamePhase::Playing);

        world.solids.retain(|s| !s.seals_exit());
        tick(&mut world, &TickInput::default(), &levels).expect("tick");
        assert_eq!(world.phase, GamePhase::LevelComplete);
    }

    #[test]
    fn test_one_actor_at_gate_is_not_enough() {
        let levels = FlatLevels;
        let mut world = flat_world();
        spawn_exit_gate(&mut world);
        let gate = world.exit_gate.as_ref().expect("gate").rect;
        if let Some(cain) = world.actor_mut(Role::EarthBound) {
            cain.pos.x = gate.x;
        }
        tick(&mut world, &TickInput::default(), &levels).expect("tick");
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_level_transition_after_delay() {
        let levels = BuiltinLevels::new();
        let mut world = WorldState::new(Tuning::default(), &levels).expect("level 1");
        world.solids.retain(|s| !s.seals_exit());
        spawn_exit_gate(&mut world);
        gather_at_gate(&mut world);
        tick(&mut world, &TickInput::default(), &levels).expect("tick");
        assert_eq!(world.phase, GamePhase::LevelComplete);

        // Frozen while waiting
        idle(&mut world, &levels, 119);
        assert_eq!(world.phase, GamePhase::LevelComplete);
        assert_eq!(world.level, 1);

        idle(&mut world, &levels, 1);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.level, 2);
        assert_eq!(world.offerings, Offerings::default());
        assert!(!world.exit_gate_spawned);
        assert!(world.exit_gate.is_none());
    }

    #[test]
    fn test_last_level_completion_enters_game_complete() {
        let levels = FlatLevels;
        let mut world = flat_world();
        assert!(world.is_last_level);
        spawn_exit_gate(&mut world);
        gather_at_gate(&mut world);
        tick(&mut world, &TickInput::default(), &levels).expect("tick");
        assert_eq!(world.phase, GamePhase::LevelComplete);
        idle(&mut world, &levels, 120);
        assert_eq!(world.phase, GamePhase::GameComplete);
        assert_eq!(world.level, 1);
    }

    #[test]
    fn test_restart_drops_pending_transition() {
        let levels = FlatLevels;
        let mut world = flat_world();
        spawn_exit_gate(&mut world);
        gather_at_gate(&mut world);
        tick(&mut world, &TickInput::default(), &levels).expect("tick");
        assert_eq!(world.phase, GamePhase::LevelComplete);

        tick(&mut world, &TickInput::default().press(Control::Restart), &levels).expect("restart");
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.schedule.len(), 1);

        // The old transition comes due but is stale
        idle(&mut world, &levels, 200);
        assert_eq!(world.phase, GamePhase::Playing);
        assert!(world.schedule.is_empty());
    }

    #[test]
    fn test_restart_round_trip() {
        let levels = BuiltinLevels::new();
        let mut world = WorldState::new(Tuning::default(), &levels).expect("level 1");
        let authored = world.solids.clone();

        world.offerings = Offerings {
            earth_bound: 1,
            sky_tender: 2,
        };
        world.solids.push(Solid::new(Rect::new(200.0, 500.0, 100.0, 20.0), SolidKind::Bridge));
        world.solids.push(Solid::new(
            Rect::new(40.0, 540.0, 40.0, 10.0),
            SolidKind::EphemeralEarth { lifetime: 100 },
        ));
        world.solids.retain(|s| !matches!(s.kind, SolidKind::Breakable { .. }));
        world.switches[0].activated = true;

        tick(&mut world, &TickInput::default().press(Control::Restart), &levels).expect("restart");
        assert_eq!(world.offerings, Offerings::default());
        assert_eq!(world.solids, authored);
        assert!(world.switches.iter().all(|s| !s.activated));
        assert!(!world.solids.iter().any(|s| s.kind.is_dynamic()));
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_finale_elimination_sequence() {
        let levels = BuiltinLevels::new();
        let mut world = WorldState::new(Tuning::default(), &levels).expect("level 1");
        load_level(&mut world, &levels, 4).expect("finale level");
        assert!(world.finale);
        assert!(world.exit_gate_spawned);
        assert_eq!(world.controlled, Role::EarthBound);
        world.drain_messages();

        // Cain walks into Abel
        let abel = world.actor(Role::SkyTender).expect("abel").pos;
        if let Some(cain) = world.actor_mut(Role::EarthBound) {
            cain.pos.x = abel.x - 10.0;
        }
        idle(&mut world, &levels, 1);
        assert_eq!(world.phase, GamePhase::GameComplete);
        assert!(world.actor(Role::SkyTender).is_none());
        let first = world.drain_messages();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].duration_ms, 5000);

        // Survivor can still move, and can't select the eliminated role
        tick(&mut world, &TickInput::default().press(Control::SelectSkyTender), &levels).expect("tick");
        assert_eq!(world.controlled, Role::EarthBound);
        let x = world.actor(Role::EarthBound).expect("cain").pos.x;
        tick(&mut world, &TickInput::default().hold(Control::MoveRight), &levels).expect("tick");
        assert!(world.actor(Role::EarthBound).expect("cain").pos.x > x);

        // Second line after one narrative step, terminal after another
        idle(&mut world, &levels, 300);
        assert_eq!(world.drain_messages().len(), 1);
        assert_eq!(world.phase, GamePhase::GameComplete);
        idle(&mut world, &levels, 300);
        assert_eq!(world.phase, GamePhase::FinalGameComplete);

        // Terminal: nothing moves, restart is ignored
        let frozen = world.time_ticks;
        tick(&mut world, &TickInput::default().press(Control::Restart), &levels).expect("tick");
        idle(&mut world, &levels, 10);
        assert_eq!(world.time_ticks, frozen);
        assert_eq!(world.phase, GamePhase::FinalGameComplete);
    }

    /// Level 4 right after the elimination
    fn eliminated_world(levels: &BuiltinLevels) -> WorldState {
        let mut world = WorldState::new(Tuning::default(), levels).expect("level 1");
        load_level(&mut world, levels, 4).expect("finale level");
        let abel = world.actor(Role::SkyTender).expect("abel").pos;
        if let Some(cain) = world.actor_mut(Role::EarthBound) {
            cain.pos.x = abel.x - 10.0;
        }
        idle(&mut world, levels, 1);
        assert_eq!(world.phase, GamePhase::GameComplete);
        world.drain_messages();
        world
    }

    #[test]
    fn test_restart_after_elimination_restores_both_actors() {
        let levels = BuiltinLevels::new();
        let mut world = eliminated_world(&levels);
        assert_eq!(world.actors.len(), 1);
        let epoch = world.epoch;

        tick(&mut world, &TickInput::default().press(Control::Restart), &levels).expect("restart");
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.actors.len(), 2);
        assert!(world.actor(Role::SkyTender).is_some());
        assert_eq!(world.epoch, epoch + 1);

        // The pending narration and finish are stale now
        for _ in 0..700 {
            tick(&mut world, &TickInput::default(), &levels).expect("tick");
            assert_ne!(world.phase, GamePhase::FinalGameComplete);
        }
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.actors.len(), 2);
        assert!(world.schedule.is_empty());
        let texts: Vec<_> = world.drain_messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["Level Restarted".to_string()]);
    }

    #[test]
    fn test_initial_role_resets_control_without_locking() {
        let levels = BuiltinLevels::new();
        let mut world = WorldState::new(Tuning::default(), &levels).expect("level 1");
        select_role(&mut world, Role::SkyTender);
        assert_eq!(world.controlled, Role::SkyTender);

        load_level(&mut world, &levels, 3).expect("level 3");
        assert_eq!(world.controlled, Role::EarthBound);
        assert_eq!(world.locked_role, None);
        select_role(&mut world, Role::SkyTender);
        assert_eq!(world.controlled, Role::SkyTender);

        // A level without a starting role keeps the current selection
        load_level(&mut world, &levels, 2).expect("level 2");
        assert_eq!(world.controlled, Role::SkyTender);
    }

    #[test]
    fn test_failed_load_leaves_world_untouched() {
        let levels = FlatLevels;
        let mut world = flat_world();
        let epoch = world.epoch;
        let err = load_level(&mut world, &levels, 9).expect_err("no such level");
        assert!(matches!(err, LevelLoadError::UnknownLevel { id: 9 }));
        assert_eq!(world.epoch, epoch);
        assert_eq!(world.level, 1);
    }

    #[test]
    fn test_pause_only_from_playing() {
        let mut world = flat_world();
        world.phase = GamePhase::LevelComplete;
        toggle_pause(&mut world);
        assert_eq!(world.phase, GamePhase::LevelComplete);
        world.phase = GamePhase::Playing;
        toggle_pause(&mut world);
        assert_eq!(world.phase, GamePhase::Paused);
    }
}
