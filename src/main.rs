use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};

mod app;
mod audio;
mod config;
mod graphics;
mod input;
mod ui;
mod viz;

use audio::{BeatAnalyzer, SUPPORTED_EXTENSIONS};
use config::VisualizerConfig;

/// Real-time audio-reactive music visualizer.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Audio file to play (wav, mp3, m4a, ogg or flac). Passing a
    /// directory lists the playable files it contains.
    path: PathBuf,

    /// Optional JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start windowed instead of fullscreen.
    #[arg(long)]
    windowed: bool,

    /// Override the initial window width.
    #[arg(long)]
    width: Option<u32>,

    /// Override the initial window height.
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = VisualizerConfig::load_or_default(cli.config.as_deref())?;
    if cli.windowed {
        config.fullscreen = false;
    }
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }

    if cli.path.is_dir() {
        return list_directory(&cli.path);
    }

    // All file problems surface here, before any window or audio device
    // is touched.
    if !cli.path.exists() {
        bail!("file {} does not exist", cli.path.display());
    }
    if !audio::is_supported(&cli.path) {
        bail!(
            "unsupported file format for {}; supported: {}",
            cli.path.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        );
    }

    let title = audio::display_title(&cli.path);
    info!("loading {}", cli.path.display());
    let (samples, sample_rate) = audio::load_samples(&cli.path)?;

    info!("analyzing tempo and beats");
    let analysis = BeatAnalyzer::new().analyze(&samples, sample_rate);
    info!(
        "tempo {:.2} BPM, {} beats detected",
        analysis.tempo_bpm,
        analysis.beat_times.len()
    );

    let track = audio::build_track(title, samples, sample_rate, analysis);
    app::run(track, config)
}

/// Track selection lives in the library browser, not here; given a
/// directory we only report what it contains and leave the choice to
/// the caller.
fn list_directory(dir: &Path) -> Result<()> {
    let mut playable: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && audio::is_supported(path))
        .collect();
    playable.sort();

    if playable.is_empty() {
        println!(
            "no playable files in {} (supported: {})",
            dir.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        );
    } else {
        println!("playable files in {}:", dir.display());
        for path in &playable {
            println!("  {}", path.display());
        }
        println!("pass one of these paths to start the visualizer");
    }
    Ok(())
}
