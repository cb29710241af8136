use serde::{Deserialize, Serialize};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::NrtResult;
use crate::nrt::action::dispatch;
use crate::nrt::schedule::Schedule;
use crate::nrt::table::{SimulationTable, Topology};
use crate::runtime::CompositionRuntime;

/// Default bound on simulated frames (a bit over 5.5 minutes at 30 fps).
pub const DEFAULT_MAX_DURATION: u64 = 10_000;

/// Options controlling a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// Last frame index that may be simulated; the table holds at most `max_duration + 1` frames.
    pub max_duration: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            max_duration: DEFAULT_MAX_DURATION,
        }
    }
}

/// Run the schedule against the runtime frame by frame and record every step.
///
/// The runtime is reset before and after the run and left outside simulator mode, even when a
/// runtime call fails part-way.
pub fn simulate<R>(
    rt: &mut R,
    schedule: &Schedule,
    opts: &SimulationOptions,
) -> NrtResult<SimulationTable>
where
    R: CompositionRuntime + ?Sized,
{
    rt.reset();
    rt.set_simulator_mode(true);

    let result = run_frames(rt, schedule, opts);

    rt.reset();
    rt.set_simulator_mode(false);
    result
}

fn run_frames<R>(
    rt: &mut R,
    schedule: &Schedule,
    opts: &SimulationOptions,
) -> NrtResult<SimulationTable>
where
    R: CompositionRuntime + ?Sized,
{
    let topology = Topology::capture(rt)?;
    let mut table = SimulationTable::new(rt.fps(), schedule.generation());

    rt.execute_composition_action(topology.root())?;
    let truncated = drive(rt, &topology, schedule, opts, |rt, _| {
        table.push(topology.record_frame(rt));
    })?;
    if truncated {
        table.mark_truncated();
    }

    // A scene already at rest still gets its resting state as frame 0.
    if table.is_empty() {
        table.push(topology.record_frame(rt));
    }

    tracing::debug!(
        frames = table.len(),
        truncated = table.truncated(),
        generation = table.generation(),
        "simulation finished"
    );
    Ok(table)
}

/// Frame loop shared by simulation and live playback: dispatch the frame's actions, tick, then
/// hand the runtime to `on_step`. Stops once nothing plays and no action is left, or past
/// `max_duration`; returns `true` in the latter case.
pub(crate) fn drive<R, F>(
    rt: &mut R,
    topology: &Topology,
    schedule: &Schedule,
    opts: &SimulationOptions,
    mut on_step: F,
) -> NrtResult<bool>
where
    R: CompositionRuntime + ?Sized,
    F: FnMut(&R, FrameIndex),
{
    let last_scheduled = schedule.last_frame();
    let mut frame = FrameIndex(0);
    loop {
        if frame.0 > opts.max_duration {
            tracing::error!(
                max_duration = opts.max_duration,
                "frame limit exceeded, run truncated"
            );
            return Ok(true);
        }

        let anything_playing = topology.any_playing(rt);
        let nothing_left = match last_scheduled {
            None => true,
            Some(last) => frame > last,
        };
        if !anything_playing && nothing_left {
            return Ok(false);
        }

        for scheduled in schedule.at_frame(frame) {
            dispatch(rt, &scheduled.action)?;
        }
        rt.tick()?;
        on_step(rt, frame);
        frame = frame.next();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nrt/simulate.rs"]
mod tests;
