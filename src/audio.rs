//! The audio output capability boundary.
//!
//! The engine consumes [`AudioBackend`] and [`AudioOutput`] and never talks
//! to a device directly. [`RodioBackend`] is the production implementation;
//! tests substitute hand-rolled fakes.

mod output;
mod sink;

pub use output::{AudioBackend, AudioEvent, AudioOutput, LoadError};
pub use sink::RodioBackend;
