//! Platform abstraction layer
//!
//! The kernel never polls devices or draws. A host supplies:
//! - an [`InputSource`] answering held / press-edge queries per tick
//! - a [`PresentationSink`] reading the world after every tick
//! - a [`MessageSink`] receiving event text with a display duration
//!
//! [`drive_frame`] wires them around one [`tick`].

use crate::error::LevelLoadError;
use crate::levels::LevelProvider;
use crate::sim::state::WorldState;
use crate::sim::tick::{Control, ControlSet, TickInput, tick};

/// Debounced control state for the current tick
pub trait InputSource {
    fn is_held(&self, control: Control) -> bool;

    /// True exactly once per physical press
    fn is_press_edge(&self, control: Control) -> bool;

    /// Snapshot every control into a [`TickInput`]
    fn sample(&self) -> TickInput {
        let mut input = TickInput::default();
        for control in Control::ALL {
            if self.is_held(control) {
                input.held.insert(control);
            }
            if self.is_press_edge(control) {
                input.pressed.insert(control);
            }
        }
        input
    }
}

impl InputSource for TickInput {
    fn is_held(&self, control: Control) -> bool {
        TickInput::is_held(self, control)
    }

    fn is_press_edge(&self, control: Control) -> bool {
        TickInput::is_press_edge(self, control)
    }
}

/// Reads the world once per tick, after resolution
pub trait PresentationSink {
    fn present(&mut self, world: &WorldState);
}

/// Fire-and-forget event text
pub trait MessageSink {
    fn show(&mut self, text: &str, duration_ms: u32);
}

/// Turns raw "keys down this frame" sets into held + press-edge state
#[derive(Debug, Clone, Default)]
pub struct EdgeTracker {
    previous: ControlSet,
    current: TickInput,
}

impl EdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the controls physically held this frame
    pub fn update(&mut self, held: ControlSet) -> TickInput {
        self.current = TickInput {
            held,
            pressed: held.difference(&self.previous),
        };
        self.previous = held;
        self.current
    }

    /// Forget held state, e.g. after focus loss, so the next hold counts as a fresh press
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl InputSource for EdgeTracker {
    fn is_held(&self, control: Control) -> bool {
        self.current.is_held(control)
    }

    fn is_press_edge(&self, control: Control) -> bool {
        self.current.is_press_edge(control)
    }
}

/// One display frame: sample input, tick once, present, flush messages.
///
/// Messages are flushed even when the tick fails so nothing queued before a
/// failed load is lost.
pub fn drive_frame(
    world: &mut WorldState,
    input: &dyn InputSource,
    levels: &dyn LevelProvider,
    presentation: &mut dyn PresentationSink,
    messages: &mut dyn MessageSink,
) -> Result<(), LevelLoadError> {
    let sampled = input.sample();
    let result = tick(world, &sampled, levels);
    presentation.present(world);
    for message in world.drain_messages() {
        messages.show(&message.text, message.duration_ms);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GamePhase, Role};
    use crate::sim::test_support::{flat_world, FlatLevels};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(GamePhase, u64)>,
        messages: Vec<(String, u32)>,
    }

    impl PresentationSink for Recorder {
        fn present(&mut self, world: &WorldState) {
            self.frames.push((world.phase, world.time_ticks));
        }
    }

    impl MessageSink for Recorder {
        fn show(&mut self, text: &str, duration_ms: u32) {
            self.messages.push((text.to_string(), duration_ms));
        }
    }

    fn held(controls: &[Control]) -> ControlSet {
        controls.iter().copied().collect()
    }

    #[test]
    fn test_edge_tracker_press_once_per_hold() {
        let mut tracker = EdgeTracker::new();
        let first = tracker.update(held(&[Control::Jump]));
        assert!(first.is_press_edge(Control::Jump));
        assert!(first.is_held(Control::Jump));

        let second = tracker.update(held(&[Control::Jump, Control::MoveLeft]));
        assert!(!second.is_press_edge(Control::Jump));
        assert!(second.is_press_edge(Control::MoveLeft));

        tracker.update(ControlSet::default());
        let again = tracker.update(held(&[Control::Jump]));
        assert!(again.is_press_edge(Control::Jump));
    }

    #[test]
    fn test_edge_tracker_reset() {
        let mut tracker = EdgeTracker::new();
        tracker.update(held(&[Control::Illuminate]));
        tracker.reset();
        assert!(!tracker.is_held(Control::Illuminate));
        assert!(tracker.update(held(&[Control::Illuminate])).is_press_edge(Control::Illuminate));
    }

    #[test]
    fn test_sample_matches_source() {
        let mut tracker = EdgeTracker::new();
        let direct = tracker.update(held(&[Control::Break, Control::Pause]));
        assert_eq!(tracker.sample(), direct);
    }

    #[test]
    fn test_drive_frame_presents_and_flushes() {
        let levels = FlatLevels;
        let mut world = flat_world();
        let mut sinks = Recorder::default();
        let mut messages = Recorder::default();
        let mut tracker = EdgeTracker::new();

        tracker.update(held(&[Control::Pause]));
        drive_frame(&mut world, &tracker, &levels, &mut sinks, &mut messages).expect("frame");
        // Still held: no second toggle
        tracker.update(held(&[Control::Pause]));
        drive_frame(&mut world, &tracker, &levels, &mut sinks, &mut messages).expect("frame");

        assert_eq!(sinks.frames.len(), 2);
        assert!(sinks.frames.iter().all(|(phase, _)| *phase == GamePhase::Paused));
        assert_eq!(messages.messages, vec![("Game Paused".to_string(), 3000)]);
        assert!(world.messages.is_empty());
    }

    #[test]
    fn test_drive_frame_moves_controlled_actor() {
        let levels = FlatLevels;
        let mut world = flat_world();
        let mut sinks = Recorder::default();
        let mut messages = Recorder::default();
        let start = world.actor(Role::EarthBound).expect("cain").pos.x;
        let input = TickInput::default().hold(Control::MoveRight);
        drive_frame(&mut world, &input, &levels, &mut sinks, &mut messages).expect("frame");
        assert!(world.actor(Role::EarthBound).expect("cain").pos.x > start);
        assert_eq!(sinks.frames, vec![(GamePhase::Playing, 1)]);
    }
}
