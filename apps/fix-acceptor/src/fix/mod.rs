//! FIX 4.2 wire layer: tag constants, the dynamic message view, the
//! incremental frame codec and timestamp helpers.
//!
//! The codec stays dynamic (ordered `tag=value` pairs) for forward
//! compatibility; the domain layer consumes typed views built from it.

pub mod codec;
pub mod message;
pub mod tags;
pub mod time;

pub use codec::{FixDecoder, FramingError, checksum, encode};
pub use message::{FixMessage, format_decimal};
