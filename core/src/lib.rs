//! Fuzzy-inference core for the Rust threat evaluation platform.
//!
//! The modules mirror the legacy threat-evaluation pipeline while providing
//! validated rule tables, total membership functions, and a deterministic
//! scoring pass over track batches.

pub mod fuzzy;
pub mod inference;
pub mod math;
pub mod prelude;
pub mod telemetry;
pub mod tracks;

pub use prelude::{EngineError, EngineResult};
