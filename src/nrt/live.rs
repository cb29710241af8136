use serde::Serialize;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::NrtResult;
use crate::nrt::schedule::Schedule;
use crate::nrt::simulate::{SimulationOptions, drive};
use crate::nrt::table::Topology;
use crate::runtime::CompositionRuntime;

/// Summary of a live run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LiveRun {
    /// Ticks performed.
    pub frames: u64,
    pub truncated: bool,
}

/// Play `schedule` frame by frame outside simulator mode, the way a real-time host would.
///
/// Starts from a reset runtime and stops on the same conditions as [`crate::simulate`]. The
/// runtime is left in its final state; `on_frame` sees it after every tick.
#[tracing::instrument(skip_all, fields(actions = schedule.len()))]
pub fn play_live<R, F>(
    rt: &mut R,
    schedule: &Schedule,
    opts: &SimulationOptions,
    mut on_frame: F,
) -> NrtResult<LiveRun>
where
    R: CompositionRuntime + ?Sized,
    F: FnMut(FrameIndex, &R),
{
    rt.reset();
    rt.set_simulator_mode(false);

    let topology = Topology::capture(rt)?;
    rt.execute_composition_action(topology.root())?;

    let mut frames = 0;
    let truncated = drive(rt, &topology, schedule, opts, |rt, frame| {
        frames += 1;
        on_frame(frame, rt);
    })?;
    tracing::debug!(frames, truncated, "live run finished");
    Ok(LiveRun { frames, truncated })
}

#[cfg(test)]
#[path = "../../tests/unit/nrt/live.rs"]
mod tests;
