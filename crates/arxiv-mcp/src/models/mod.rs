//! Data models for tool inputs and query parameters.

mod enums;
mod inputs;

pub use enums::{ImageFormat, SortBy, SortOrder};
pub use inputs::*;
