use serde::Serialize;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{NrtError, NrtResult};
use crate::nrt::action::dispatch;
use crate::nrt::schedule::Schedule;
use crate::nrt::table::SimulationTable;
use crate::runtime::CompositionRuntime;

/// What a seek did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeekOutcome {
    /// No simulation table exists yet; the runtime was not touched.
    Skipped,
    Applied {
        /// Frame the timestamp maps to.
        target_frame: FrameIndex,
        /// Table entry that was restored.
        table_index: usize,
        /// `true` when `target_frame` was past the table and the last entry was used.
        clamped: bool,
    },
}

/// Rebuild the composition state that real-time playback of `schedule` reaches at `timestamp_ms`.
///
/// `table` must have been built against `schedule`.
pub fn seek<R>(
    rt: &mut R,
    table: &SimulationTable,
    schedule: &Schedule,
    timestamp_ms: f64,
) -> NrtResult<SeekOutcome>
where
    R: CompositionRuntime + ?Sized,
{
    if !timestamp_ms.is_finite() {
        return Err(NrtError::validation(format!(
            "seek timestamp must be finite, got {timestamp_ms}"
        )));
    }
    if table.is_empty() {
        tracing::debug!(timestamp_ms, "no simulation table, seek skipped");
        return Ok(SeekOutcome::Skipped);
    }
    if table.generation() != schedule.generation() {
        return Err(NrtError::validation(format!(
            "simulation table generation {} does not match schedule generation {}",
            table.generation(),
            schedule.generation()
        )));
    }

    rt.reset();
    rt.set_simulator_mode(true);

    let result = restore(rt, table, schedule, timestamp_ms);

    rt.set_no_animation_mode(false);
    rt.set_simulator_mode(false);
    let outcome = result?;
    let root = rt.root();
    rt.refresh_render(root)?;
    Ok(outcome)
}

fn restore<R>(
    rt: &mut R,
    table: &SimulationTable,
    schedule: &Schedule,
    timestamp_ms: f64,
) -> NrtResult<SeekOutcome>
where
    R: CompositionRuntime + ?Sized,
{
    let target_frame = table.fps().ms_to_frame_floor(timestamp_ms);
    let Some(resolved) = table.resolve(target_frame) else {
        return Ok(SeekOutcome::Skipped);
    };
    let snapshots = &resolved.frame.snapshots;

    // Priming: every detached composition gets its default entrance state back.
    for snap in snapshots {
        rt.execute_composition_action(snap.composition)?;
    }

    for scheduled in schedule.through_frame(target_frame) {
        dispatch(rt, &scheduled.action)?;
    }

    for snap in snapshots {
        rt.execute_composition_action(snap.composition)?;
        rt.execute_frame_actions_through(snap.composition, snap.frame)?;
        rt.go_to(snap.composition, snap.frame)?;
        rt.set_visible(snap.composition, snap.is_visible)?;
    }

    Ok(SeekOutcome::Applied {
        target_frame,
        table_index: resolved.index,
        clamped: resolved.clamped,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/nrt/seek.rs"]
mod tests;
