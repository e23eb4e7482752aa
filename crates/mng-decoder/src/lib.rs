#![warn(clippy::pedantic)]

pub mod async_reader;
pub mod buffer;
pub mod checkpoint;
pub mod config;
pub mod decoder;
pub mod error;
pub mod push;
pub mod source;

pub use async_reader::AsyncChunkReader;
pub use checkpoint::{Checkpoint, Step, Tier};
pub use config::DecoderConfig;
pub use decoder::{MngDecoder, ReadStatus};
pub use error::{DecodeError, Warning};
pub use push::Ownership;
pub use source::{DataSource, NoSource, Pull, ReadSource, SliceSource};
