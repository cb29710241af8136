use serde::{Deserialize, Serialize};

use crate::foundation::error::{NrtError, NrtResult};
use crate::graphic::playback::{PlayRequest, PlayTransition, Playback, StopTransition};
use crate::nrt::action::UpdateParams;
use crate::nrt::schedule::ScheduleEntry;
use crate::nrt::seek::SeekOutcome;
use crate::nrt::session::{NrtSession, NrtState, SimulationReport};
use crate::nrt::simulate::SimulationOptions;
use crate::runtime::CompositionRuntime;

/// Per-graphic configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicOptions {
    /// Number of logical steps; `0` makes play/stop drive live playback directly.
    pub step_count: usize,
    pub simulation: SimulationOptions,
}

impl Default for GraphicOptions {
    fn default() -> Self {
        Self {
            step_count: 1,
            simulation: SimulationOptions::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadParams {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayParams {
    pub skip_animation: bool,
    pub delta: i64,
    pub goto: Option<usize>,
}

impl Default for PlayParams {
    fn default() -> Self {
        let req = PlayRequest::default();
        Self {
            skip_animation: false,
            delta: req.delta,
            goto: req.goto,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StopParams {
    pub skip_animation: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleParams {
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoToTimeParams {
    pub timestamp: f64,
}

/// Status reply for host control actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub status_code: u16,
    pub status_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<usize>,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            status_code: 200,
            status_message: "OK".to_string(),
            current_step: None,
        }
    }

    pub fn ok_at(current_step: Option<usize>) -> Self {
        Self {
            current_step,
            ..Self::ok()
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status_code: 400,
            status_message: msg.into(),
            current_step: None,
        }
    }

    /// Status reply for a failed action, for hosts that speak status codes only.
    pub fn from_error(err: &NrtError) -> Self {
        let status_code = match err {
            NrtError::Validation(_) | NrtError::Serde(_) => 400,
            NrtError::NotReady(_) | NrtError::Runtime(_) | NrtError::Other(_) => 500,
        };
        Self {
            status_code,
            status_message: err.to_string(),
            current_step: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}

/// A loadable graphic: lifecycle, step playback and NRT seeking over one runtime.
#[derive(Debug)]
pub struct Graphic<R> {
    options: GraphicOptions,
    runtime: Option<R>,
    playback: Playback,
    nrt: NrtSession,
}

fn not_loaded() -> NrtError {
    NrtError::not_ready("graphic runtime is not loaded")
}

impl<R: CompositionRuntime> Graphic<R> {
    pub fn new(options: GraphicOptions) -> Self {
        Self {
            options,
            runtime: None,
            playback: Playback::new(options.step_count),
            nrt: NrtSession::new(options.simulation),
        }
    }

    pub fn options(&self) -> &GraphicOptions {
        &self.options
    }

    pub fn is_loaded(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn runtime(&self) -> Option<&R> {
        self.runtime.as_ref()
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn nrt_state(&self) -> &NrtState {
        self.nrt.state()
    }

    pub fn session(&self) -> &NrtSession {
        &self.nrt
    }

    /// Attach the runtime and apply the initial data.
    ///
    /// A previously loaded runtime is replaced together with its step cursor and NRT state.
    pub fn load(&mut self, runtime: R, params: LoadParams) -> NrtResult<ActionResponse> {
        self.playback.reset();
        self.nrt.clear();
        let rt = self.runtime.insert(runtime);
        if let Some(data) = &params.data {
            rt.update(data)?;
        }
        tracing::debug!(step_count = self.options.step_count, "graphic loaded");
        Ok(ActionResponse::ok())
    }

    /// Detach and return the runtime, forgetting the step cursor and the NRT state.
    pub fn dispose(&mut self) -> Option<R> {
        self.playback.reset();
        self.nrt.clear();
        self.runtime.take()
    }

    pub fn update_action(&mut self, params: &UpdateParams) -> NrtResult<ActionResponse> {
        let rt = self.runtime.as_mut().ok_or_else(not_loaded)?;
        if let Some(data) = &params.data {
            rt.update(data)?;
        }
        Ok(ActionResponse::ok())
    }

    pub fn play_action(&mut self, params: &PlayParams) -> NrtResult<ActionResponse> {
        let rt = self.runtime.as_mut().ok_or_else(not_loaded)?;
        let req = PlayRequest {
            delta: params.delta,
            goto: params.goto,
        };
        match self.playback.play(req) {
            PlayTransition::Live | PlayTransition::Stepped(_) => {
                with_animation_mode(rt, params.skip_animation, |rt| rt.play())?;
                Ok(ActionResponse::ok_at(self.playback.current_step()))
            }
            PlayTransition::BeyondEnd => {
                tracing::debug!("play past the last step, stopping");
                self.stop_action(&StopParams {
                    skip_animation: params.skip_animation,
                })
            }
        }
    }

    pub fn stop_action(&mut self, params: &StopParams) -> NrtResult<ActionResponse> {
        let rt = self.runtime.as_mut().ok_or_else(not_loaded)?;
        match self.playback.stop() {
            StopTransition::Live => {
                with_animation_mode(rt, params.skip_animation, |rt| rt.pause())?;
            }
            StopTransition::Stopped => {
                with_animation_mode(rt, params.skip_animation, |rt| rt.stop())?;
            }
            StopTransition::NotPlaying => {
                return Ok(ActionResponse::bad_request(
                    "Bad request, graphic is not playing",
                ));
            }
        }
        Ok(ActionResponse::ok())
    }

    pub fn custom_action(&mut self, _params: &serde_json::Value) -> NrtResult<ActionResponse> {
        Ok(ActionResponse::bad_request("No custom actions supported"))
    }

    pub fn set_actions_schedule(&mut self, params: &ScheduleParams) -> NrtResult<SimulationReport> {
        let rt = self.runtime.as_mut().ok_or_else(not_loaded)?;
        self.nrt.set_actions_schedule(rt, &params.schedule)
    }

    pub fn go_to_time(&mut self, params: &GoToTimeParams) -> NrtResult<SeekOutcome> {
        let rt = self.runtime.as_mut().ok_or_else(not_loaded)?;
        self.nrt.go_to_time(rt, params.timestamp)
    }
}

impl<R: CompositionRuntime> Default for Graphic<R> {
    fn default() -> Self {
        Self::new(GraphicOptions::default())
    }
}

// No-animation mode only applies to the one runtime call it was requested for.
fn with_animation_mode<R, F>(rt: &mut R, skip_animation: bool, f: F) -> NrtResult<()>
where
    R: CompositionRuntime + ?Sized,
    F: FnOnce(&mut R) -> NrtResult<()>,
{
    rt.set_no_animation_mode(skip_animation);
    let out = f(rt);
    rt.set_no_animation_mode(false);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/graphic/host.rs"]
mod tests;
