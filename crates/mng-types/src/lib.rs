#![warn(clippy::pedantic)]

pub mod error;
pub mod fields;
pub mod raw;
pub mod ihdr;
pub mod jhdr;
pub mod mhdr;
pub mod palette;
pub mod image_data;
pub mod text;
pub mod color;
pub mod phys;
pub mod time;
pub mod term;
pub mod loop_control;
pub mod object;
pub mod back;
pub mod meta;
pub mod chunk;
pub mod registry;
pub mod document;

pub use chunk::Chunk;
pub use document::{ChunkDocument, ChunkId};
pub use error::TypeError;
pub use raw::RawChunk;
pub use registry::{ChunkRegistry, RegistryEntry};

pub use back::Back;
pub use color::{Bkgd, Chrm, Gama, Iccp, Sbit, Srgb};
pub use ihdr::Ihdr;
pub use image_data::ImageData;
pub use jhdr::Jhdr;
pub use loop_control::{Endl, Loop};
pub use meta::{Expi, Fpri, Need, Seek};
pub use mhdr::{Mhdr, MhdrProfile};
pub use object::{Clip, ClipBounds, Defi, Disc, Move, Show};
pub use palette::{Hist, Plte, Trns};
pub use phys::{Phys, PixelDimensions};
pub use term::{Term, TermRepeat};
pub use text::{Itxt, Text, Ztxt};
pub use time::Time;
