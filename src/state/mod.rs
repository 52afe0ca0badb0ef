pub mod revision;
pub mod store;

pub use revision::*;
pub use store::*;
