mod api;
mod error;
pub mod render;

pub use api::*;
pub use error::*;
