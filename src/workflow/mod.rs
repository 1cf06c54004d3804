//! The workflow step graph: ordered steps, their mapping lists, routing
//! resolution and structural validation.
pub mod model;
pub mod routing;
pub mod status;
pub mod step;
mod validate;

pub use model::*;
pub use routing::*;
pub use status::*;
pub use step::*;
