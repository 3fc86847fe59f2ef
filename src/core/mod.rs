pub mod attributes;
pub mod error;
pub mod snapshot;
pub mod store;

pub use attributes::*;
pub use error::*;
pub use snapshot::*;
pub use store::*;
