use anyhow::{Context, Result};
use log::info;
use rodio::{Decoder, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Formats the decoder is expected to handle. wav/mp3/m4a are the
/// documented minimum; ogg and flac come along with the symphonia
/// backend at no extra cost.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "ogg", "flac"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|s| *s == ext)
        })
        .unwrap_or(false)
}

/// Decodes an audio file into mono f32 samples plus its sample rate.
/// Multi-channel input is mixed down by averaging each frame's channels.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32)> {
    let path = path.as_ref();
    let file = BufReader::new(
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
    );
    let source = Decoder::new(file)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    let sample_rate = source.sample_rate();
    let channels = source.channels() as usize;

    let interleaved: Vec<f32> = source.convert_samples().collect();

    let samples: Vec<f32> = if channels <= 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    info!(
        "loaded {} ({} Hz, {} samples, {} channel(s) in)",
        path.display(),
        sample_rate,
        samples.len(),
        channels
    );

    Ok((samples, sample_rate))
}

/// Derives a human-friendly title from the file stem, turning the common
/// "Artist - Title" naming into "Title by Artist".
pub fn display_title(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    match stem.split_once(" - ") {
        Some((artist, title)) => format!("{} by {}", title, artist),
        None => stem.to_string(),
    }
}
