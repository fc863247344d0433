// Teevi Media Providers
//
// HTTP clients and extension implementations for the supported sources.
//
// Architecture:
// - teevi-core: host-facing models and capability traits
// - teevi-media-providers: provider clients + extensions (Jellyfin, TMDB, Live Italy)
// - teevi: command-line runner driving the extensions

// Shared error types
pub mod error;

// Providers
pub mod jellyfin;
pub mod live_italy;
pub mod tmdb;

// Re-export extension types for convenience
pub use error::ProviderClientError;
pub use jellyfin::error::{DiscoveryError, JellyfinError};
pub use jellyfin::{JellyfinClient, JellyfinExtension, ServerResolver};
pub use live_italy::error::LiveItalyError;
pub use live_italy::LiveItalyExtension;
pub use tmdb::error::TmdbError;
pub use tmdb::{TmdbClient, TmdbExtension};
