use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use media_fetch::{
    auth::{Anonymous, AuthProvider, CookieAuth},
    http::scraper::Scraper,
    tracing::init_tracing_subscriber,
    FetchConfig, MediaFetcherBuilder,
};
use track_library::LocalLibrary;

const DEFAULT_TRACK_URL: &str = "https://soundcloud.com/riotvirtual/now-we-got-problems";

#[derive(Parser)]
#[command(name = "media-fetch", about = "Track and playlist downloader")]
struct Cli {
    /// Web client id sent with every API request
    #[arg(long, env = "CLIENT_ID")]
    client_id: String,

    /// Browser session cookie; must contain `oauth_token`
    #[arg(long, env = "COOKIE", hide_env_values = true)]
    cookie: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long, env = "USER_AGENT", default_value = FetchConfig::DEFAULT_USER_AGENT)]
    user_agent: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download a single track
    Track {
        /// Track page URL
        #[arg(default_value = DEFAULT_TRACK_URL)]
        url: String,

        /// Output file; defaults to music.mp3, or music.wav with a session cookie
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Download the tracks of a playlist that are missing from a directory
    Sync {
        /// Playlist page URL
        playlist_url: String,

        /// Library directory for this playlist
        #[arg(long)]
        dir: PathBuf,

        /// Stop at the first track that is already downloaded
        #[arg(long)]
        refresh: bool,
    },
    /// List the tracks of a playlist that are missing from a directory
    Compare {
        /// Playlist page URL
        playlist_url: String,

        /// Library directory for this playlist
        #[arg(long)]
        dir: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let auth: Box<dyn AuthProvider> = match cli.cookie {
        Some(cookie) => Box::new(CookieAuth::new(cookie).context("Invalid COOKIE")?),
        None => Box::new(Anonymous),
    };

    let fetcher = MediaFetcherBuilder::new(cli.client_id)
        .http(Scraper::default())
        .auth(auth)
        .user_agent(cli.user_agent)
        .build();

    match cli.command {
        Command::Track { url, output } => {
            let output = output.unwrap_or_else(|| fetcher.default_output_path());
            tracing::info!(%url, output = %output.display(), "Downloading track...");

            fetcher
                .download_track(&url, &output)
                .await
                .context("Failed to download track")?;
        }
        Command::Sync {
            playlist_url,
            dir,
            refresh,
        } => {
            let library = LocalLibrary::init(&dir, fetcher.output_extension())?;
            tracing::info!(%playlist_url, dir = %dir.display(), refresh, "Syncing playlist...");

            let report = fetcher
                .sync_playlist(&playlist_url, &library, refresh)
                .await?;

            tracing::info!(
                downloaded = report.downloaded.len(),
                skipped = report.skipped.len(),
                failed = report.failed.len(),
                "Playlist sync finished"
            );
            for name in &report.failed {
                tracing::warn!(track = %name, "Track failed to download");
            }
        }
        Command::Compare { playlist_url, dir } => {
            let library = LocalLibrary::init(&dir, fetcher.output_extension())?;
            let missing = fetcher.compare_playlist(&playlist_url, &library).await?;

            tracing::info!(count = missing.len(), %playlist_url, "Compared playlist with library");
            for name in missing {
                println!("{name}");
            }
        }
    }

    Ok(())
}
