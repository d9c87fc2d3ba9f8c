use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use soundsweep::media::{self, AudioSource};
use soundsweep::{Config, Downloader, SoundCloudError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "soundsweep-cli")]
#[command(about = "CLI for Soundsweep - SoundCloud profile archiver", long_about = None)]
struct Cli {
    /// SoundCloud client ID (can also be set via CLIENT_ID env var)
    #[arg(long, env = "CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,

    /// Profile URL to archive, e.g. https://soundcloud.com/someone
    #[arg(short, long, env = "PROFILE_URL")]
    profile: Option<String>,

    /// Output directory for downloads
    #[arg(short, long, env = "OUT_DIR", default_value = "downloads")]
    output: PathBuf,

    /// API base URL
    #[arg(long, env = "SOUNDCLOUD_API_BASE", default_value = soundsweep::config::DEFAULT_API_BASE)]
    api_base: String,

    /// Tracks requested per catalog page
    #[arg(long, default_value_t = soundsweep::config::DEFAULT_PAGE_SIZE)]
    page_size: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download all artwork and audio of the profile
    Download,
    /// List the profile's tracks and their sources without downloading
    List,
}

impl Cli {
    fn config(&self) -> Result<Config, SoundCloudError> {
        let client_id = self.client_id.clone().unwrap_or_default();
        let profile = self.profile.clone().unwrap_or_default();

        Ok(Config::new(client_id, profile)?
            .with_output_dir(&self.output)
            .with_api_base(&self.api_base)
            .with_page_size(self.page_size))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("soundsweep=info")))
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed: {}", e.report());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), SoundCloudError> {
    let downloader = Downloader::new(cli.config()?)?;

    match cli.command {
        Commands::Download => {
            let summary = downloader.run().await?;
            println!(
                "✅ Done. Saved {} artwork and {} audio file(s) in {}/",
                summary.artwork_saved,
                summary.audio_saved,
                downloader.config().output_dir.display()
            );
            println!(
                "   Tracks: {}, already present: {}, no audio: {}",
                summary.total_tracks, summary.already_present, summary.audio_unavailable
            );
            if !summary.all_successful() {
                println!(
                    "   Failed: {} artwork, {} audio",
                    summary.artwork_failed, summary.audio_failed
                );
            }
        }
        Commands::List => {
            let (user, tracks) = downloader.catalog().await?;
            let client_id = downloader.api().client_id();
            println!("{} (#{}) - {} tracks", user.username, user.id, tracks.len());
            for (i, track) in tracks.iter().enumerate() {
                let artwork = if media::best_artwork_url(track).is_some() {
                    "artwork"
                } else {
                    "-"
                };
                let audio = media::select_audio_source(track, client_id)
                    .as_ref()
                    .map(AudioSource::label)
                    .unwrap_or("no audio");
                println!(
                    "{}. {} (ID: {}) [{}, {}]",
                    i + 1,
                    track.display_title(),
                    track.id,
                    artwork,
                    audio
                );
            }
        }
    }

    Ok(())
}
