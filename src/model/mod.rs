pub use whiskers_core::personality::{BoundariesLogic, PersonalityLogic};
pub use whiskers_core::{Cat, CatError, CatRegistry, CatSettings};

pub mod animation {
    pub use whiskers_core::animation::*;
}
pub mod brain {
    pub use whiskers_core::brain::*;
}
pub mod cat {
    pub use whiskers_core::cat::*;
}
pub mod config {
    pub use whiskers_core::config::*;
}
pub mod detector {
    pub use whiskers_core::detector::*;
}
pub mod environment {
    pub use whiskers_core::environment::*;
}
pub mod events {
    pub use whiskers_core::events::*;
}
pub mod interest {
    pub use whiskers_core::interest::*;
}
pub mod lifecycle {
    pub use whiskers_core::lifecycle::*;
}
pub mod metrics {
    pub use whiskers_core::metrics::*;
}
pub mod personality {
    pub use whiskers_core::personality::*;
}
pub mod pool {
    pub use whiskers_core::pool::*;
}
pub mod registry {
    pub use whiskers_core::registry::*;
}
pub mod render {
    pub use whiskers_core::render::*;
}
pub mod seed {
    pub use whiskers_core::seed::*;
}
pub mod persistence {
    pub use whiskers_io::*;
}
pub mod data {
    pub use whiskers_data::*;
}
