//! Tick-tagged driver actions replayed by the harness.

use crate::ecus::MoveDir;
use crate::error::SimError;
use crate::frames::SelectorRange;
use heapless::Vec;
use serde::{Deserialize, Serialize};

pub const MAX_SCENARIO_ACTIONS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    MoveLever { dir: MoveDir },
    ReleaseLever,
    PressButton,
    ReleaseButton,
    Throttle { on: bool },
    SetEngineRpm { rpm: i32 },
    SetSelector { range: SelectorRange },
    EnterLimp,
    ClearLimp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub at_tick: u64,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStats {
    pub total_scheduled: u32,
    pub total_applied: u32,
    pub pending: u8,
}

/// Pending actions in chronological order. Actions sharing a tick keep
/// their scheduling order.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pending: Vec<ScheduledAction, MAX_SCENARIO_ACTIONS>,
    stats: ScenarioStats,
}

impl Scenario {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scenario from a list of actions, all relative to tick 0.
    pub fn from_actions<I>(actions: I) -> Result<Self, SimError>
    where
        I: IntoIterator<Item = ScheduledAction>,
    {
        let mut scenario = Self::new();
        for scheduled in actions {
            scenario.schedule(scheduled.at_tick, scheduled.action, 0)?;
        }
        Ok(scenario)
    }

    pub fn schedule(&mut self, at_tick: u64, action: Action, current_tick: u64) -> Result<(), SimError> {
        if at_tick < current_tick {
            return Err(SimError::ScenarioInPast { at_tick, current_tick });
        }
        self.pending
            .push(ScheduledAction { at_tick, action })
            .map_err(|_| SimError::ScenarioFull {
                capacity: MAX_SCENARIO_ACTIONS,
            })?;
        // Stable, so same-tick actions stay in the order they were scheduled.
        self.pending.sort_by_key(|scheduled| scheduled.at_tick);

        self.stats.total_scheduled = self.stats.total_scheduled.wrapping_add(1);
        self.stats.pending = self.pending.len() as u8;
        Ok(())
    }

    /// Remove and return every action due at or before `tick`.
    pub fn take_due(&mut self, tick: u64) -> Vec<Action, MAX_SCENARIO_ACTIONS> {
        let mut due = Vec::new();
        for scheduled in self.pending.iter().filter(|s| s.at_tick <= tick) {
            let _ = due.push(scheduled.action);
        }
        self.pending.retain(|s| s.at_tick > tick);

        self.stats.total_applied = self.stats.total_applied.wrapping_add(due.len() as u32);
        self.stats.pending = self.pending.len() as u8;
        due
    }

    #[must_use]
    pub fn pending(&self) -> &[ScheduledAction] {
        &self.pending
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> ScenarioStats {
        self.stats
    }

    /// Park, select D, accelerate through the gears, play with the program
    /// button, coast down, limp for a while, and park again.
    pub fn drive_cycle() -> Result<Self, SimError> {
        let plan = [
            (2, Action::MoveLever { dir: MoveDir::Down }),
            (3, Action::MoveLever { dir: MoveDir::Down }),
            (4, Action::MoveLever { dir: MoveDir::Down }),
            (6, Action::Throttle { on: true }),
            (60, Action::PressButton),
            (62, Action::ReleaseButton),
            (64, Action::PressButton),
            (65, Action::ReleaseButton),
            (70, Action::Throttle { on: false }),
            (110, Action::EnterLimp),
            (115, Action::PressButton),
            (116, Action::ReleaseButton),
            (125, Action::ClearLimp),
            (128, Action::PressButton),
            (129, Action::ReleaseButton),
            (140, Action::MoveLever { dir: MoveDir::Up }),
            (141, Action::MoveLever { dir: MoveDir::Up }),
            (142, Action::MoveLever { dir: MoveDir::Up }),
        ];

        Self::from_actions(
            plan.into_iter()
                .map(|(at_tick, action)| ScheduledAction { at_tick, action }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_sorted_by_tick() {
        let mut scenario = Scenario::new();
        scenario.schedule(10, Action::EnterLimp, 0).unwrap();
        scenario.schedule(5, Action::PressButton, 0).unwrap();
        scenario.schedule(5, Action::ReleaseButton, 0).unwrap();

        let ticks: std::vec::Vec<u64> = scenario.pending().iter().map(|s| s.at_tick).collect();
        assert_eq!(ticks, vec![5, 5, 10]);
        assert_eq!(scenario.pending()[0].action, Action::PressButton);
    }

    #[test]
    fn test_drive_cycle_builds_in_order() {
        let scenario = Scenario::drive_cycle().unwrap();
        assert_eq!(scenario.stats().total_scheduled, 18);
        assert_eq!(scenario.pending().len(), 18);
        assert!(scenario.pending().windows(2).all(|w| w[0].at_tick <= w[1].at_tick));
        assert_eq!(scenario.pending()[0].action, Action::MoveLever { dir: MoveDir::Down });
    }

    #[test]
    fn test_action_json_shape() {
        let json = r#"{"at_tick": 3, "action": {"type": "move_lever", "dir": "Down"}}"#;
        let scheduled: ScheduledAction = serde_json::from_str(json).unwrap();
        assert_eq!(scheduled.action, Action::MoveLever { dir: MoveDir::Down });
    }
}
