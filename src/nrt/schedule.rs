use serde::{Deserialize, Serialize};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{NrtError, NrtResult};
use crate::nrt::action::GraphicAction;

/// One host-supplied schedule item, in arbitrary order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Milliseconds in the host's schedule time base.
    pub timestamp: f64,
    pub action: GraphicAction,
}

impl ScheduleEntry {
    pub fn new(timestamp: f64, action: GraphicAction) -> Self {
        Self { timestamp, action }
    }
}

/// A schedule item bound to the frame it fires on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledAction {
    pub timestamp_ms: f64,
    pub frame: FrameIndex,
    pub action: GraphicAction,
}

/// Frame-indexed schedule, ascending by timestamp with ties kept in input order.
///
/// `generation` identifies the `set_actions_schedule` call that produced it; a simulation table
/// is only valid for the schedule generation it was built against.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schedule {
    actions: Vec<ScheduledAction>,
    generation: u64,
}

impl Schedule {
    pub fn normalize(entries: &[ScheduleEntry], fps: Fps) -> NrtResult<Self> {
        fps.validate()?;
        let mut actions = entries
            .iter()
            .map(|e| {
                if !e.timestamp.is_finite() {
                    return Err(NrtError::validation(format!(
                        "schedule timestamp must be finite, got {}",
                        e.timestamp
                    )));
                }
                Ok(ScheduledAction {
                    timestamp_ms: e.timestamp,
                    frame: fps.ms_to_frame_floor(e.timestamp),
                    action: e.action.clone(),
                })
            })
            .collect::<NrtResult<Vec<_>>>()?;

        // `sort_by` is stable, so equal timestamps keep their input order.
        actions.sort_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms));
        Ok(Self {
            actions,
            generation: 0,
        })
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn actions(&self) -> &[ScheduledAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions firing exactly on `frame`, in schedule order.
    pub fn at_frame(&self, frame: FrameIndex) -> impl Iterator<Item = &ScheduledAction> {
        self.actions.iter().filter(move |a| a.frame == frame)
    }

    /// Actions firing on or before `frame`, in schedule order.
    pub fn through_frame(&self, frame: FrameIndex) -> impl Iterator<Item = &ScheduledAction> {
        self.actions.iter().filter(move |a| a.frame <= frame)
    }

    /// Latest frame any action fires on, `None` for an empty schedule.
    pub fn last_frame(&self) -> Option<FrameIndex> {
        self.actions.iter().map(|a| a.frame).max()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nrt/schedule.rs"]
mod tests;
