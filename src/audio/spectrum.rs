use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::{tick_to_sample, Track};

pub const FFT_WINDOW_SIZE: usize = 2048;
pub const FFT_OUTPUT_SIZE: usize = FFT_WINDOW_SIZE / 2;

/// Computes the normalized magnitude spectrum for the analysis window at
/// the current playback position. Pure given the immutable track and a
/// tick snapshot, so it is safe to call once per frame with nothing but
/// a read of the position clock.
pub struct SpectrumExtractor {
    fft: Arc<dyn Fft<f32>>,
    tick_rate: u32,
}

impl SpectrumExtractor {
    pub fn new(tick_rate: u32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_WINDOW_SIZE);
        Self { fft, tick_rate }
    }

    /// Returns exactly `FFT_OUTPUT_SIZE` magnitudes in [0, 1]. A window
    /// that would read past the end of the buffer yields silence (all
    /// zeros) rather than an error, and every routine is expected to
    /// degrade to its base geometry on that input.
    pub fn extract(&self, track: &Track, tick: u64) -> Vec<f32> {
        let start = tick_to_sample(tick, track.sample_rate, self.tick_rate);
        if start + FFT_WINDOW_SIZE >= track.samples.len() {
            return vec![0.0; FFT_OUTPUT_SIZE];
        }

        let mut buffer: Vec<Complex<f32>> = track.samples[start..start + FFT_WINDOW_SIZE]
            .iter()
            .map(|&sample| Complex::new(sample, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let mut spectrum: Vec<f32> = buffer[..FFT_OUTPUT_SIZE]
            .iter()
            .map(|bin| bin.norm())
            .collect();

        let max = spectrum.iter().fold(0.0f32, |a, &b| a.max(b));
        if max > 0.0 {
            for magnitude in &mut spectrum {
                *magnitude /= max;
            }
        }

        spectrum
    }
}
