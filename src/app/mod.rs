//! Headless driver: owns the registry, the environment and a render target,
//! and ticks every cat once per frame.

pub mod render;
pub mod shutdown;
pub mod simulation;

pub use render::TracingRenderTarget;
pub use shutdown::ShutdownManager;
pub use simulation::{load_config, Simulation};
