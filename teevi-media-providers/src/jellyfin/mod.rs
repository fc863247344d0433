//! Jellyfin Provider
//!
//! Server discovery, REST client and the Jellyfin extension.

pub mod client;
pub mod discovery;
pub mod error;
pub mod extension;
pub mod mappers;
pub mod types;

pub use client::{ClientInfo, ItemsQuery, JellyfinClient, JellyfinSession};
pub use discovery::{
    find_server_candidates, normalize_address, resolve_server, score_server_candidates, HttpProbe,
    ResolvedServer, ServerCandidate, ServerProbe, ServerResolver,
};
pub use error::{CandidateFailure, DiscoveryError, JellyfinError};
pub use extension::JellyfinExtension;
