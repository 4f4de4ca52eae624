//! Mirror definitions and the per-definition run loop

pub mod config;
pub mod runner;

pub use config::{parse_definitions, MirrorDefinition, Source};
pub use runner::MirrorRunner;
