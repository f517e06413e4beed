use glam::Vec2;

use super::primitives::{Color, Primitive};
use super::{bin_intensity, Viewport};

const BAR_COUNT: usize = 64;
const BAR_SPACING: f32 = 2.0;
const LOG_SCALE_FACTOR: f32 = 1.5;
const MAX_HEIGHT_RATIO: f32 = 1.0;
const MIN_HEIGHT_RATIO: f32 = 0.05;
const BASE_MOVEMENT_SPEED: f32 = 2.0;
const COLOR_TIME_SPEED: f32 = 5.0;
const SATURATION: f32 = 0.8;

/// Bottom-anchored spectrum bars on logarithmically spaced bins, so the
/// low end gets as much screen as the top octaves. Heights pass through
/// a log curve for visibility and never drop below a floor, which also
/// keeps the silent baseline gently moving.
pub fn render(spectrum: &[f32], elapsed: f32, viewport: &Viewport) -> Vec<Primitive> {
    let width = viewport.width as f32;
    let height = viewport.height as f32;
    let bar_width = width / BAR_COUNT as f32;
    let time_offset = elapsed * BASE_MOVEMENT_SPEED;

    let mut primitives = Vec::with_capacity(BAR_COUNT);
    for i in 0..BAR_COUNT {
        let intensity = bin_intensity(spectrum, log_bin_index(i, spectrum.len()));
        let scaled = (intensity * 9.0 + 1.0).log10() * LOG_SCALE_FACTOR;

        let base_movement = ((time_offset + i as f32 * 0.2).sin() * 0.1 + 1.0) * MIN_HEIGHT_RATIO;
        let bar_height = ((scaled + base_movement) * height * MAX_HEIGHT_RATIO)
            .clamp(height * MIN_HEIGHT_RATIO, height * MAX_HEIGHT_RATIO);

        let hue = i as f32 / BAR_COUNT as f32 + elapsed / COLOR_TIME_SPEED;
        let value = (0.5 + scaled * 0.4).clamp(0.4, 0.9);

        primitives.push(Primitive::Rect {
            origin: Vec2::new(i as f32 * bar_width, height - bar_height),
            size: Vec2::new((bar_width - BAR_SPACING).max(1.0), bar_height),
            color: Color::hsv(hue, SATURATION, value),
        });
    }
    primitives
}

/// Logarithmically spaced bin index: i = 0 maps to bin 1's neighborhood
/// and the last bar lands on the top bin.
fn log_bin_index(bar: usize, spectrum_len: usize) -> usize {
    if spectrum_len == 0 {
        return 0;
    }
    let max_exponent = (spectrum_len as f32).log10();
    let exponent = bar as f32 / BAR_COUNT as f32 * max_exponent;
    (10.0f32.powf(exponent).round() as usize).min(spectrum_len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: u32, height: u32) -> Viewport {
        Viewport {
            width,
            height,
            fullscreen: false,
        }
    }

    #[test]
    fn one_rect_per_bar() {
        let spectrum = vec![0.5f32; 1024];
        let primitives = render(&spectrum, 1.0, &viewport(1280, 720));
        assert_eq!(primitives.len(), BAR_COUNT);
    }

    #[test]
    fn silent_bars_keep_their_floor_height() {
        let spectrum = vec![0.0f32; 1024];
        for p in render(&spectrum, 0.0, &viewport(1280, 720)) {
            let Primitive::Rect { size, .. } = p else {
                panic!("expected rects");
            };
            assert!(size.y >= 720.0 * MIN_HEIGHT_RATIO - 1e-3);
        }
    }

    #[test]
    fn heights_never_exceed_the_viewport() {
        let spectrum = vec![1.0f32; 1024];
        for p in render(&spectrum, 3.0, &viewport(1280, 720)) {
            let Primitive::Rect { origin, size, .. } = p else {
                panic!("expected rects");
            };
            assert!(size.y <= 720.0 + 1e-3);
            assert!(origin.y >= -1e-3);
        }
    }

    #[test]
    fn bin_indices_are_log_spaced_and_in_range() {
        let len = 1024;
        assert_eq!(log_bin_index(0, len), 1);
        assert_eq!(log_bin_index(BAR_COUNT - 1, len), 919);
        let mut last = 0;
        for bar in 0..BAR_COUNT {
            let index = log_bin_index(bar, len);
            assert!(index < len);
            assert!(index >= last);
            last = index;
        }
    }

    #[test]
    fn tiny_viewport_still_renders() {
        let spectrum = vec![0.0f32; 1024];
        assert_eq!(render(&spectrum, 0.0, &viewport(1, 1)).len(), BAR_COUNT);
    }
}
