//! Live Italy Provider
//!
//! Italian free-to-air live channels and program guide.

pub mod channels;
pub mod epg;
pub mod error;
pub mod extension;
pub mod playlist;

pub use channels::{canonical_channel_id, channel_category, ChannelCategory};
pub use error::LiveItalyError;
pub use extension::LiveItalyExtension;
pub use playlist::{parse_playlist, PlaylistItem};
