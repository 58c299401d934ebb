pub mod decoder;
pub mod error;
pub mod event;
mod metadata;
pub mod stream;
pub mod symtab;

pub use decoder::JournalDecoder;
pub use error::DecodeError;
pub use event::{Event, MetadataValue};
