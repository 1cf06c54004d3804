pub mod access;
pub mod document;
pub mod store;

pub use access::*;
pub use document::*;
pub use store::*;
