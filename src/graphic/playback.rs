use serde::{Deserialize, Serialize};

/// Logical step position of a multi-step graphic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "step", rename_all = "snake_case")]
pub enum StepState {
    #[default]
    Idle,
    Stepping(usize),
}

/// Where a play request should move the step cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayRequest {
    /// Relative move from the current step.
    pub delta: i64,
    /// Absolute target; wins over `delta` when set.
    pub goto: Option<usize>,
}

impl Default for PlayRequest {
    fn default() -> Self {
        Self {
            delta: 1,
            goto: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayTransition {
    /// Stepless graphic: run live playback, the cursor is untouched.
    Live,
    Stepped(usize),
    /// The target is past the last step; the caller performs a stop.
    BeyondEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopTransition {
    /// Stepless graphic: halt live playback.
    Live,
    Stopped,
    NotPlaying,
}

/// Step cursor of a graphic. Pure bookkeeping; the host drives the runtime from the transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playback {
    step_count: usize,
    current: StepState,
}

impl Playback {
    pub fn new(step_count: usize) -> Self {
        Self {
            step_count,
            current: StepState::Idle,
        }
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn current(&self) -> StepState {
        self.current
    }

    pub fn current_step(&self) -> Option<usize> {
        match self.current {
            StepState::Idle => None,
            StepState::Stepping(n) => Some(n),
        }
    }

    pub fn play(&mut self, req: PlayRequest) -> PlayTransition {
        if self.step_count == 0 {
            return PlayTransition::Live;
        }

        let target = match req.goto {
            Some(step) => step,
            None => {
                // Idle sits just before step 0.
                let from = self.current_step().map_or(-1, |n| n as i64);
                usize::try_from(from.saturating_add(req.delta)).unwrap_or(0)
            }
        };

        if target >= self.step_count {
            return PlayTransition::BeyondEnd;
        }
        self.current = StepState::Stepping(target);
        PlayTransition::Stepped(target)
    }

    pub fn stop(&mut self) -> StopTransition {
        if self.step_count == 0 {
            return StopTransition::Live;
        }
        match self.current {
            StepState::Idle => StopTransition::NotPlaying,
            StepState::Stepping(_) => {
                self.current = StepState::Idle;
                StopTransition::Stopped
            }
        }
    }

    pub fn reset(&mut self) {
        self.current = StepState::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graphic/playback.rs"]
mod tests;
