pub mod actions;
pub mod commands;
pub mod errors;
pub mod media;
pub mod validation;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
