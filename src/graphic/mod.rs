//! Host-facing graphic lifecycle.

pub mod host;
pub mod playback;
