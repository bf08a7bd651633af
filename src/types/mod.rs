pub mod errors;
pub mod openrouter;

pub use errors::{Result, ToolError};
