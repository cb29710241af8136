use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::NrtResult;
use crate::foundation::ids::CompositionId;

/// A layer slot of a composition that embeds another composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EmbeddedComposition {
    /// The embedded child composition.
    pub child: CompositionId,
    /// `true` when the child runs its own timeline instead of following its parent's frame.
    pub detach_playhead: bool,
}

/// The animation engine the NRT simulator drives.
///
/// Implementations own a scene graph of compositions addressed by [`CompositionId`]. The simulator
/// only ever reads state through the query methods and changes it through the operations below;
/// it never holds references into the graph across calls.
///
/// Queries for an id the runtime does not know return the inert value (`false`, frame 0, no
/// children). Operations on an unknown id fail with [`crate::NrtError::Runtime`].
pub trait CompositionRuntime {
    /// Frame rate used for timestamp/frame conversion.
    fn fps(&self) -> Fps;

    /// Root composition of the scene.
    fn root(&self) -> CompositionId;

    /// Layer slots of `id` that embed a composition, in layer order.
    fn embedded(&self, id: CompositionId) -> Vec<EmbeddedComposition>;

    /// Whether `id` is currently advancing.
    fn is_playing(&self, id: CompositionId) -> bool;

    /// Current playhead of `id`.
    fn active_frame(&self, id: CompositionId) -> FrameIndex;

    /// Whether `id` is shown.
    fn is_visible(&self, id: CompositionId) -> bool;

    /// Restore every composition, the runtime flags and the data fields to their initial state.
    fn reset(&mut self);

    /// Skip real-time pacing and live side effects while still applying state transitions.
    fn set_simulator_mode(&mut self, enabled: bool);

    /// Suppress entrance/exit transitions for subsequent `play`/`stop` calls.
    fn set_no_animation_mode(&mut self, enabled: bool);

    /// Advance exactly one frame. Attached children follow their parent implicitly.
    fn tick(&mut self) -> NrtResult<()>;

    /// Place the playhead of `id` at `frame`, re-deriving attached descendants.
    fn go_to(&mut self, id: CompositionId, frame: FrameIndex) -> NrtResult<()>;

    /// Show (`true`) or hide (`false`) `id`.
    fn set_visible(&mut self, id: CompositionId, visible: bool) -> NrtResult<()>;

    /// Re-arm the default entrance state of `id`.
    fn execute_composition_action(&mut self, id: CompositionId) -> NrtResult<()>;

    /// Apply the instantaneous timeline effects of `id` scheduled at or before `frame`.
    fn execute_frame_actions_through(&mut self, id: CompositionId, frame: FrameIndex)
    -> NrtResult<()>;

    /// Request a repaint of `id`.
    fn refresh_render(&mut self, id: CompositionId) -> NrtResult<()>;

    /// Start (or resume) the graphic.
    fn play(&mut self) -> NrtResult<()>;

    /// Take the graphic out, running its exit transition unless animations are suppressed.
    fn stop(&mut self) -> NrtResult<()>;

    /// Halt live playback in place.
    fn pause(&mut self) -> NrtResult<()>;

    /// Merge host data into the graphic's fields.
    fn update(&mut self, data: &serde_json::Value) -> NrtResult<()>;
}
