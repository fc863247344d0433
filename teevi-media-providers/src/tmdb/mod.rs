//! TMDB Provider
//!
//! The Movie Database metadata and home feed.

pub mod client;
pub mod error;
pub mod extension;
pub mod types;

pub use client::{DiscoverSorting, ImageKind, TmdbClient};
pub use error::TmdbError;
pub use extension::{parse_show_id, TmdbExtension};
pub use types::MediaType;
