//! Declarative scene model and the deterministic in-memory runtime built from it.

pub mod model;
pub mod runtime;
