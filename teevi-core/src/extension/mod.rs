// Extension Contract
//
// Two-tier architecture:
//
// Tier 1: teevi-core/extension (this module)
//   - Host-facing models (Show, ShowEntry, LiveProgram, ...)
//   - Capability traits (MetadataExtension, FeedExtension, ...)
//
// Tier 2: teevi-media-providers
//   - HTTP clients for Jellyfin, TMDB and the Live Italy feeds
//   - Extension implementations calling those clients

pub mod error;
pub mod models;
pub mod traits;

pub use error::*;
pub use models::*;
pub use traits::*;
