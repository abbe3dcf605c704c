pub mod data;

pub use data::behavior::*;
pub use data::cat::*;
pub use data::spatial::*;
pub use data::target::*;
