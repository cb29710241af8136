use serde::Serialize;

use crate::foundation::error::{NrtError, NrtResult};
use crate::nrt::schedule::{Schedule, ScheduleEntry};
use crate::nrt::seek::{SeekOutcome, seek};
use crate::nrt::simulate::{SimulationOptions, simulate};
use crate::nrt::table::SimulationTable;
use crate::runtime::CompositionRuntime;

/// Host-visible NRT state of one graphic instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NrtState {
    /// Last timestamp passed to `go_to_time`, re-applied after every rebuild.
    pub last_requested_timestamp_ms: f64,
    pub schedule: Schedule,
}

/// Summary of a `set_actions_schedule` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub generation: u64,
    pub frames: usize,
    pub truncated: bool,
    /// Seek back to the last requested timestamp against the new table.
    pub seek: SeekOutcome,
}

/// Owns the schedule and the simulation table built from it.
///
/// Both entry points take `&mut self`, so a rebuild and a seek can never interleave; every table
/// is stamped with the generation of the schedule it was built from and a seek refuses a table
/// from another generation.
#[derive(Clone, Debug)]
pub struct NrtSession {
    options: SimulationOptions,
    state: NrtState,
    table: Option<SimulationTable>,
    next_generation: u64,
}

impl NrtSession {
    pub fn new(options: SimulationOptions) -> Self {
        Self {
            options,
            state: NrtState::default(),
            table: None,
            next_generation: 1,
        }
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    pub fn state(&self) -> &NrtState {
        &self.state
    }

    /// Table of the current schedule, `None` until the first `set_actions_schedule`.
    pub fn table(&self) -> Option<&SimulationTable> {
        self.table.as_ref()
    }

    /// Replace the schedule, re-simulate, then re-seek to the last requested timestamp.
    ///
    /// On error the previous schedule and table stay in place.
    #[tracing::instrument(skip(self, rt, entries), fields(entries = entries.len()))]
    pub fn set_actions_schedule<R>(
        &mut self,
        rt: &mut R,
        entries: &[ScheduleEntry],
    ) -> NrtResult<SimulationReport>
    where
        R: CompositionRuntime + ?Sized,
    {
        let generation = self.next_generation;
        let schedule = Schedule::normalize(entries, rt.fps())?.with_generation(generation);
        let table = simulate(rt, &schedule, &self.options)?;
        self.next_generation += 1;

        let frames = table.len();
        let truncated = table.truncated();
        self.state.schedule = schedule;
        let table = self.table.insert(table);

        let reseek = seek(
            rt,
            table,
            &self.state.schedule,
            self.state.last_requested_timestamp_ms,
        )?;
        Ok(SimulationReport {
            generation,
            frames,
            truncated,
            seek: reseek,
        })
    }

    /// Show the state real-time playback reaches at `timestamp_ms`.
    ///
    /// The timestamp is remembered even when no schedule exists yet, so the first rebuild lands
    /// on it.
    #[tracing::instrument(skip(self, rt))]
    pub fn go_to_time<R>(&mut self, rt: &mut R, timestamp_ms: f64) -> NrtResult<SeekOutcome>
    where
        R: CompositionRuntime + ?Sized,
    {
        if !timestamp_ms.is_finite() {
            return Err(NrtError::validation(format!(
                "timestamp must be finite, got {timestamp_ms}"
            )));
        }
        self.state.last_requested_timestamp_ms = timestamp_ms;

        let Some(table) = self.table.as_ref() else {
            tracing::debug!("no schedule set, seek skipped");
            return Ok(SeekOutcome::Skipped);
        };
        seek(rt, table, &self.state.schedule, timestamp_ms)
    }

    /// Drop the schedule, the table and the remembered timestamp.
    pub fn clear(&mut self) {
        self.state = NrtState::default();
        self.table = None;
    }
}

impl Default for NrtSession {
    fn default() -> Self {
        Self::new(SimulationOptions::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nrt/session.rs"]
mod tests;
