//! graphic-nrt reproduces the state of a real-time broadcast graphic at any point in time.
//!
//! A host hands over a list of timestamped control actions (play, stop, update). The crate runs
//! them once, frame by frame, against a [`CompositionRuntime`] in simulator mode and records a
//! [`SimulationTable`] of every detached composition's playhead and visibility. Seeking to an
//! arbitrary timestamp then restores that state without replaying real time:
//!
//! - Build a schedule with [`NrtSession::set_actions_schedule`]
//! - Jump around with [`NrtSession::go_to_time`]
//! - Or drive the full lifecycle through [`Graphic`]
//!
//! [`SceneRuntime`] is a deterministic runtime over a JSON scene description, used by the CLI and
//! the tests.
#![forbid(unsafe_code)]

pub mod foundation;
pub mod graphic;
pub mod nrt;
pub mod runtime;
pub mod scene;

pub use crate::foundation::core::{Fps, FrameIndex};
pub use crate::foundation::error::{NrtError, NrtResult};
pub use crate::foundation::ids::CompositionId;
pub use crate::graphic::host::{
    ActionResponse, GoToTimeParams, Graphic, GraphicOptions, LoadParams, PlayParams,
    ScheduleParams, StopParams,
};
pub use crate::graphic::playback::{PlayRequest, Playback, StepState};
pub use crate::nrt::action::{GraphicAction, TransitionParams, UpdateParams};
pub use crate::nrt::fingerprint::{TableFingerprint, fingerprint_table};
pub use crate::nrt::live::{LiveRun, play_live};
pub use crate::nrt::schedule::{Schedule, ScheduleEntry, ScheduledAction};
pub use crate::nrt::seek::{SeekOutcome, seek};
pub use crate::nrt::session::{NrtSession, NrtState, SimulationReport};
pub use crate::nrt::simulate::{DEFAULT_MAX_DURATION, SimulationOptions, simulate};
pub use crate::nrt::table::{CompositionSnapshot, SimulationFrame, SimulationTable};
pub use crate::runtime::{CompositionRuntime, EmbeddedComposition};
pub use crate::scene::model::SceneDef;
pub use crate::scene::runtime::{CompositionVisual, SceneRuntime, VisualState};
