pub mod beat;
pub mod loader;
pub mod spectrum;
pub mod transport;

pub use beat::{BeatAnalysis, BeatAnalyzer};
pub use loader::{display_title, is_supported, load_samples, SUPPORTED_EXTENSIONS};
pub use spectrum::SpectrumExtractor;
pub use transport::PlaybackTransport;

use std::sync::Arc;

/// A fully decoded and analyzed piece of music. Immutable after load;
/// shared between the transport (which owns playback of it) and the
/// per-frame readers via `Arc`.
#[derive(Debug, Clone)]
pub struct Track {
    pub title: String,
    /// Mono samples in [-1.0, 1.0].
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Display metadata from the beat analyzer; never re-validated.
    pub tempo_bpm: f32,
    /// Beat timestamps in seconds, ascending. Display metadata only.
    pub beat_times: Vec<f32>,
}

impl Track {
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Converts a render-tick count into a sample offset. This is the one
/// position clock the whole engine shares: the transport uses it to pick
/// the resume offset and the spectrum extractor uses it to locate the
/// analysis window. It counts render iterations, not samples the device
/// actually consumed, so picture and sound drift when the effective
/// frame rate deviates from `tick_rate`.
pub fn tick_to_sample(tick: u64, sample_rate: u32, tick_rate: u32) -> usize {
    if tick_rate == 0 {
        return 0;
    }
    (tick * sample_rate as u64 / tick_rate as u64) as usize
}

/// Assembles the immutable track from the loader and analyzer outputs.
pub fn build_track(
    title: String,
    samples: Vec<f32>,
    sample_rate: u32,
    analysis: BeatAnalysis,
) -> Arc<Track> {
    Arc::new(Track {
        title,
        samples,
        sample_rate,
        tempo_bpm: analysis.tempo_bpm,
        beat_times: analysis.beat_times,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_to_sample_matches_resume_contract() {
        assert_eq!(tick_to_sample(120, 44100, 60), 88200);
        assert_eq!(tick_to_sample(0, 44100, 60), 0);
        assert_eq!(tick_to_sample(600, 44100, 60), 441000);
    }

    #[test]
    fn tick_to_sample_survives_degenerate_rates() {
        assert_eq!(tick_to_sample(100, 44100, 0), 0);
        // 1 Hz ticks: one full second of samples per tick.
        assert_eq!(tick_to_sample(3, 48000, 1), 144000);
    }

    #[test]
    fn track_duration_from_samples() {
        let track = Track {
            title: "test".into(),
            samples: vec![0.0; 44100],
            sample_rate: 44100,
            tempo_bpm: 120.0,
            beat_times: Vec::new(),
        };
        assert!((track.duration_seconds() - 1.0).abs() < 1e-6);
    }
}
