//! Core data structures for the Whiskers cat simulation.

pub mod behavior;
pub mod cat;
pub mod spatial;
pub mod target;
