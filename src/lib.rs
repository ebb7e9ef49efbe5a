pub mod auth;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod prediction;
pub mod server;

pub use error::{Error, Result};
