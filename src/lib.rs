pub mod bsky;
pub mod config;
pub mod error;
pub mod lists;
pub mod tui;

pub use error::{ApiError, Error, Result};
