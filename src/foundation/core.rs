use crate::foundation::error::{NrtError, NrtResult};

/// Zero-based frame position, either a simulation step or a composition playhead.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn as_usize(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rational frame rate, `num / den` frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> NrtResult<Self> {
        if den == 0 {
            return Err(NrtError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(NrtError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn validate(self) -> NrtResult<()> {
        Self::new(self.num, self.den).map(|_| ())
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Frame that is showing at `ms` milliseconds: `floor(ms / (1000 / fps))`.
    ///
    /// Computed as `ms * num / (1000 * den)` so whole-frame timestamps land exactly on their
    /// frame (2000 ms at 30 fps is frame 60, not 59). Negative times map to frame 0.
    pub fn ms_to_frame_floor(self, ms: f64) -> FrameIndex {
        let frames = (ms * f64::from(self.num)) / (1000.0 * f64::from(self.den));
        FrameIndex(frames.floor().max(0.0) as u64)
    }

    /// Start time of `frame` in milliseconds.
    pub fn frame_to_ms(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) * 1000.0 * f64::from(self.den) / f64::from(self.num)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
