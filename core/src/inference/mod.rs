pub mod engine;

pub use engine::InferenceEngine;
