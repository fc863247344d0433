mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

use teevi_core::extension::{FeedExtension, LiveExtension, MetadataExtension, VideoExtension};
use teevi_core::{logging, Config};
use teevi_media_providers::{JellyfinExtension, LiveItalyExtension, ServerResolver, TmdbExtension};

use cli::{Args, Command, Provider};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn user_agent(config: &Config) -> String {
    format!("{}/{}", config.client.name, config.client.version)
}

fn metadata_extension(provider: Provider, config: &Config) -> Result<Box<dyn MetadataExtension>> {
    Ok(match provider {
        Provider::Jellyfin => Box::new(JellyfinExtension::from_config(config)?),
        Provider::Tmdb => Box::new(TmdbExtension::from_config(config)?),
    })
}

fn feed_extension(provider: Provider, config: &Config) -> Result<Box<dyn FeedExtension>> {
    Ok(match provider {
        Provider::Jellyfin => Box::new(JellyfinExtension::from_config(config)?),
        Provider::Tmdb => Box::new(TmdbExtension::from_config(config)?),
    })
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Resolve { address } => {
            let resolver = ServerResolver::with_http_probe(config.http.probe_timeout(), &user_agent(config))?;
            print_json(&resolver.resolve_server(&address).await?)
        }
        Command::Search { provider, query } => {
            let extension = metadata_extension(provider, config)?;
            print_json(&extension.fetch_shows_by_query(&query).await?)
        }
        Command::Show { provider, id } => {
            let extension = metadata_extension(provider, config)?;
            print_json(&extension.fetch_show(&id).await?)
        }
        Command::Episodes { provider, id, season } => {
            let extension = metadata_extension(provider, config)?;
            print_json(&extension.fetch_episodes(&id, season).await?)
        }
        Command::Feed { provider } => {
            let extension = feed_extension(provider, config)?;
            print_json(&extension.fetch_feed_collections().await?)
        }
        Command::Trending { provider } => {
            let extension = feed_extension(provider, config)?;
            print_json(&extension.fetch_trending_shows().await?)
        }
        Command::Collection { list_id } => {
            let extension = TmdbExtension::from_config(config)?;
            print_json(&extension.fetch_collection(&list_id).await?)
        }
        Command::Assets { id } => {
            let extension = JellyfinExtension::from_config(config)?;
            print_json(&extension.fetch_video_assets(&id).await?)
        }
        Command::Channels => {
            let extension = LiveItalyExtension::from_config(config)?;
            print_json(&extension.fetch_live_channels().await?)
        }
        Command::Programs { start, end } => {
            let extension = LiveItalyExtension::from_config(config)?;
            print_json(&extension.fetch_channel_programs(start, end).await?)
        }
        Command::LiveAsset { channel } => {
            let extension = LiveItalyExtension::from_config(config)?;
            print_json(&extension.fetch_live_video_asset(&channel).await?)
        }
        Command::MakeEpgGuide { output } => {
            let extension = LiveItalyExtension::from_config(config)?;
            let count = extension.make_epg_guide(&output).await?;
            info!(programs = count, output = %output.display(), "EPG guide generated");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load configuration
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    // 2. Validate configuration (fail fast on misconfigurations)
    if let Err(errors) = config.validate() {
        for e in &errors {
            eprintln!("Config validation error: {e}");
        }
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s)",
            errors.len()
        ));
    }

    // 3. Initialize logging
    logging::init_logging(&config.logging)?;
    debug!(command = ?args.command, "Running command");

    run(args.command, &config).await
}
