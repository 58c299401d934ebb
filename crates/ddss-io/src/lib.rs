mod compression;
mod error;

pub use compression::{open_input, CompressionHint};
pub use error::IoOpenError;
