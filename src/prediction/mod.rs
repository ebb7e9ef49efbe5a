mod service;
mod table;
mod types;

pub use service::*;
pub use table::*;
pub use types::*;
