//! Autonomous animated cats: a headless driver around `whiskers_core`.

pub mod app;
pub mod model;
