pub mod dataset;
pub mod registry;
pub mod types;

pub use dataset::*;
pub use registry::*;
pub use types::*;
