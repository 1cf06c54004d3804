//! Instance data and the coercion rules applied to it during evaluation.
pub mod coerce;
pub mod record;

pub use coerce::*;
pub use record::*;
