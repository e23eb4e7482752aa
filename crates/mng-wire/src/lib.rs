#![warn(clippy::pedantic)]

pub mod crc;
pub mod crc_policy;
pub mod error;
pub mod frame;
pub mod signature;
pub mod tag;

pub use crc_policy::{AncillaryCrc, CrcInput, CrcOutput, CrcPolicy, CrcVerdict, CriticalCrc};
pub use error::WireError;
pub use signature::Flavor;
pub use tag::ChunkTag;
