pub mod condition;
pub mod definition;

pub use condition::*;
pub use definition::*;
