//! Scheduled-event queue
//!
//! Delayed effects (level transitions, the closing narrative) are queued
//! against the tick counter and polled once per tick. Each entry carries the
//! epoch and phase it was scheduled under; anything that no longer matches
//! when it comes due is stale and gets dropped by the caller.

use serde::{Deserialize, Serialize};

use super::state::GamePhase;

/// Deferred effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Leave `LevelComplete`: load the next level or finish the game
    AdvanceLevel,
    /// Show a narrative line
    Narrate { text: String },
    /// Enter the terminal phase
    Finish,
}

/// Queue entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub fire_at: u64,
    pub epoch: u32,
    /// Phase the world must still be in for the event to apply
    pub phase: GamePhase,
    pub action: Deferred,
}

impl ScheduledEvent {
    pub fn is_stale(&self, epoch: u32, phase: GamePhase) -> bool {
        self.epoch != epoch || self.phase != phase
    }
}

/// Pending events ordered by fire tick (ties keep insertion order)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pending: Vec<ScheduledEvent>,
}

impl Schedule {
    pub fn push(&mut self, event: ScheduledEvent) {
        let at = self
            .pending
            .iter()
            .position(|e| e.fire_at > event.fire_at)
            .unwrap_or(self.pending.len());
        self.pending.insert(at, event);
    }

    /// Remove and return every event due at or before `now`, in firing order
    pub fn take_due(&mut self, now: u64) -> Vec<ScheduledEvent> {
        let due = self.pending.iter().take_while(|e| e.fire_at <= now).count();
        self.pending.drain(..due).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(fire_at: u64, text: &str) -> ScheduledEvent {
        ScheduledEvent {
            fire_at,
            epoch: 0,
            phase: GamePhase::GameComplete,
            action: Deferred::Narrate {
                text: text.to_string(),
            },
        }
    }

    #[test]
    fn test_take_due_in_order() {
        let mut schedule = Schedule::default();
        schedule.push(event(20, "late"));
        schedule.push(event(10, "early"));
        schedule.push(event(10, "early-second"));

        assert!(schedule.take_due(5).is_empty());
        let due = schedule.take_due(10);
        assert_eq!(due, vec![event(10, "early"), event(10, "early-second")]);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.take_due(100), vec![event(20, "late")]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_staleness() {
        let e = event(1, "x");
        assert!(!e.is_stale(0, GamePhase::GameComplete));
        assert!(e.is_stale(1, GamePhase::GameComplete));
        assert!(e.is_stale(0, GamePhase::Playing));
    }
}
