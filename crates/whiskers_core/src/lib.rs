//! # Whiskers Core
//!
//! Decision and scheduling logic for autonomous animated cats.
//!
//! This crate contains:
//! - Interest scoring and nearby-target detection
//! - The per-cat behavior state machine ("brain")
//! - The visual state machine with timed, eased transitions
//! - Pooled animation resources activated by pause/resume
//! - Lifecycle coordination and per-cat event streams
//! - An explicitly owned registry exposing the control surface
//!
//! ## Example
//!
//! ```
//! use whiskers_core::environment::Environment;
//! use whiskers_core::registry::CatRegistry;
//! use whiskers_core::render::NullRenderTarget;
//! use whiskers_data::{InteractionTarget, Position, TargetKind};
//!
//! let mut registry = CatRegistry::default();
//! let mut render = NullRenderTarget;
//! let id = registry.create_from_seed("mittens", &mut render).unwrap();
//!
//! let mut env = Environment::new(registry.boundaries()).unwrap();
//! env.add_target(InteractionTarget::new(TargetKind::Pointer, Position::new(640.0, 360.0)));
//!
//! registry.tick_all(&mut env, &mut render, 16.0);
//! assert!(registry.get(id).unwrap().brain_ticks() > 0);
//! ```

/// Visual state machine, transition table and easing curves
pub mod animation;
/// Per-cat behavior decisions
pub mod brain;
/// A single autonomous cat
pub mod cat;
/// Configuration management
pub mod config;
/// Nearby-target detection
pub mod detector;
/// Interaction targets and viewport supplied from outside
pub mod environment;
pub mod error;
/// Per-cat event streams
pub mod events;
/// Interest scoring
pub mod interest;
/// Pause/resume/destroy coordination
pub mod lifecycle;
/// Metrics collection and structured logging
pub mod metrics;
/// Trait validation and presets
pub mod personality;
/// Pooled animation resources
pub mod pool;
/// Collection of live cats
pub mod registry;
/// Render target boundary
pub mod render;
/// Deterministic generation from text seeds
pub mod seed;

pub use cat::{Cat, CatSettings};
pub use error::{CatError, Result};
pub use registry::CatRegistry;
