use std::collections::VecDeque;

/// Tempo and beat positions for a whole track. Produced once at load
/// time and carried on the `Track` purely as display metadata.
#[derive(Debug, Clone)]
pub struct BeatAnalysis {
    pub tempo_bpm: f32,
    /// Seconds from the start of the buffer, ascending.
    pub beat_times: Vec<f32>,
}

/// Offline energy-based beat estimator. Walks the buffer in hop-sized
/// windows and flags a beat whenever the hop energy rises clearly above
/// the recent average, with a refractory interval so one kick drum does
/// not register twice.
pub struct BeatAnalyzer {
    hop_size: usize,
    history_size: usize,
    min_beat_interval: f32,
}

const DEFAULT_HOP: usize = 1024;
const DEFAULT_BPM: f32 = 120.0;

impl Default for BeatAnalyzer {
    fn default() -> Self {
        Self {
            hop_size: DEFAULT_HOP,
            // roughly one second of hops at 44.1 kHz
            history_size: 43,
            min_beat_interval: 0.3,
        }
    }
}

impl BeatAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&self, samples: &[f32], sample_rate: u32) -> BeatAnalysis {
        if samples.is_empty() || sample_rate == 0 {
            return BeatAnalysis {
                tempo_bpm: DEFAULT_BPM,
                beat_times: Vec::new(),
            };
        }

        let hop_seconds = self.hop_size as f32 / sample_rate as f32;
        let mut history: VecDeque<f32> = VecDeque::with_capacity(self.history_size);
        let mut beat_times = Vec::new();
        let mut last_beat = f32::NEG_INFINITY;

        for (hop_index, hop) in samples.chunks(self.hop_size).enumerate() {
            let energy = rms(hop);
            let timestamp = hop_index as f32 * hop_seconds;

            if history.len() >= 10 {
                let mean = history.iter().sum::<f32>() / history.len() as f32;
                let variance = history
                    .iter()
                    .map(|&e| (e - mean) * (e - mean))
                    .sum::<f32>()
                    / (history.len() - 1) as f32;
                let threshold = mean + variance.sqrt() * 1.5;

                if energy > threshold
                    && energy > 0.01
                    && timestamp - last_beat >= self.min_beat_interval
                {
                    beat_times.push(timestamp);
                    last_beat = timestamp;
                }
            }

            history.push_back(energy);
            if history.len() > self.history_size {
                history.pop_front();
            }
        }

        BeatAnalysis {
            tempo_bpm: estimate_tempo(&beat_times),
            beat_times,
        }
    }
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Average of the plausible (0.3 s - 2.0 s, i.e. 30-200 BPM) inter-beat
/// intervals, or the default when too few beats were found.
fn estimate_tempo(beat_times: &[f32]) -> f32 {
    let intervals: Vec<f32> = beat_times
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|&dt| (0.3..=2.0).contains(&dt))
        .collect();

    if intervals.is_empty() {
        return DEFAULT_BPM;
    }

    let average = intervals.iter().sum::<f32>() / intervals.len() as f32;
    60.0 / average
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Click track: short loud bursts on a fixed grid over silence.
    fn click_track(sample_rate: u32, bpm: f32, seconds: f32) -> Vec<f32> {
        let total = (sample_rate as f32 * seconds) as usize;
        let mut samples = vec![0.0f32; total];
        let beat_period = (sample_rate as f32 * 60.0 / bpm) as usize;
        let click_len = sample_rate as usize / 100;
        let mut start = 0;
        while start < total {
            for i in start..(start + click_len).min(total) {
                samples[i] = 0.9;
            }
            start += beat_period;
        }
        samples
    }

    #[test]
    fn click_track_tempo_is_recovered() {
        let samples = click_track(44100, 120.0, 10.0);
        let analysis = BeatAnalyzer::new().analyze(&samples, 44100);
        assert!(!analysis.beat_times.is_empty());
        assert!(
            (analysis.tempo_bpm - 120.0).abs() < 10.0,
            "estimated {} BPM",
            analysis.tempo_bpm
        );
    }

    #[test]
    fn beat_times_are_ascending() {
        let samples = click_track(44100, 90.0, 8.0);
        let analysis = BeatAnalyzer::new().analyze(&samples, 44100);
        for pair in analysis.beat_times.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn silence_has_no_beats() {
        let samples = vec![0.0f32; 44100 * 3];
        let analysis = BeatAnalyzer::new().analyze(&samples, 44100);
        assert!(analysis.beat_times.is_empty());
        assert_eq!(analysis.tempo_bpm, 120.0);
    }

    #[test]
    fn empty_input_is_harmless() {
        let analysis = BeatAnalyzer::new().analyze(&[], 44100);
        assert!(analysis.beat_times.is_empty());
    }
}
