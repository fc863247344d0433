use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "teevi-ext")]
#[command(about = "Run Teevi extensions from the command line", long_about = None)]
pub struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, short, global = true, env = "TEEVI_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Extensions providing metadata and feeds
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Jellyfin,
    Tmdb,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a Jellyfin server address to the server's own base URL
    Resolve {
        /// Hostname, host:port or URL
        address: String,
    },

    /// Search shows by title
    Search {
        #[arg(value_enum)]
        provider: Provider,
        query: String,
    },

    /// Show detail
    Show {
        #[arg(value_enum)]
        provider: Provider,
        id: String,
    },

    /// Episodes of one season
    Episodes {
        #[arg(value_enum)]
        provider: Provider,
        id: String,
        season: u32,
    },

    /// Home feed collections
    Feed {
        #[arg(value_enum)]
        provider: Provider,
    },

    /// Trending shows
    Trending {
        #[arg(value_enum)]
        provider: Provider,
    },

    /// Every title of a TMDB list
    Collection {
        list_id: String,
    },

    /// Playable video assets of a Jellyfin item
    Assets {
        id: String,
    },

    /// Live channels
    Channels,

    /// Live programs, optionally limited to a time window (RFC 3339)
    Programs {
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long)]
        end: Option<DateTime<Utc>>,
    },

    /// Stream of a live channel
    LiveAsset {
        channel: String,
    },

    /// Build the live program guide from the XMLTV sources
    MakeEpgGuide {
        #[arg(long, short, default_value = "assets/data/epg-guide.json")]
        output: PathBuf,
    },
}
