//! Non-real-time playback: schedule normalization, offline simulation and seeking.

pub mod action;
pub mod fingerprint;
pub mod live;
pub mod schedule;
pub mod seek;
pub mod session;
pub mod simulate;
pub mod table;
