use serde::{Deserialize, Serialize};

use crate::foundation::error::NrtResult;
use crate::runtime::CompositionRuntime;

/// A host control action that can be scheduled at a timestamp.
///
/// Accepts both the short (`"play"`) and the lifecycle-method (`"playAction"`) spellings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GraphicAction {
    #[serde(alias = "playAction")]
    Play {
        #[serde(default)]
        params: TransitionParams,
    },
    #[serde(alias = "stopAction")]
    Stop {
        #[serde(default)]
        params: TransitionParams,
    },
    #[serde(alias = "updateAction")]
    Update {
        #[serde(default)]
        params: UpdateParams,
    },
}

impl GraphicAction {
    pub fn play() -> Self {
        Self::Play {
            params: TransitionParams::default(),
        }
    }

    pub fn stop() -> Self {
        Self::Stop {
            params: TransitionParams::default(),
        }
    }

    pub fn update(data: serde_json::Value) -> Self {
        Self::Update {
            params: UpdateParams { data: Some(data) },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Play { .. } => "play",
            Self::Stop { .. } => "stop",
            Self::Update { .. } => "update",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionParams {
    #[serde(default)]
    pub skip_animation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateParams {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Apply one action to the runtime. Returns once the action's state change is complete.
pub(crate) fn dispatch<R>(rt: &mut R, action: &GraphicAction) -> NrtResult<()>
where
    R: CompositionRuntime + ?Sized,
{
    match action {
        GraphicAction::Play { params } => {
            rt.set_no_animation_mode(params.skip_animation);
            rt.play()
        }
        GraphicAction::Stop { params } => {
            rt.set_no_animation_mode(params.skip_animation);
            rt.stop()
        }
        GraphicAction::Update { params } => match &params.data {
            Some(data) => rt.update(data),
            None => Ok(()),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nrt/action.rs"]
mod tests;
