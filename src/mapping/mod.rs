//! Data mappings: the compatibility matrix that constrains how they are authored,
//! and the executor that applies them to instance data.
pub mod compat;
pub mod definition;
pub mod executor;

pub use compat::*;
pub use definition::*;
pub use executor::*;
