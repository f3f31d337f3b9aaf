//! Test module for determinism and integration tests.
//!
//! - `determinism.rs`: same seed and same actions give the same trajectory
//! - `integration.rs`: end-to-end scenarios through [`Engine::step`](crate::engine::Engine::step)
//! - `helpers.rs`: board setup utilities

mod helpers;

// Re-export for convenience
pub use helpers::*;
