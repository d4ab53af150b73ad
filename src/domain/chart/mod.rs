//! Chart aggregate: display schema, view parameters and the rendering surface seams.

pub mod services;
pub mod surface;
pub mod value_objects;

pub use services::*;
pub use surface::*;
pub use value_objects::*;
