#![warn(clippy::pedantic)]

pub mod encoder;
pub mod error;
pub mod writer;

pub use encoder::MngEncoder;
pub use error::EncodeError;
pub use writer::{ChunkWriter, WriterConfig};
