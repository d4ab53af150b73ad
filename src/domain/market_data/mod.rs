//! Market data as received from the tick supplier.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
