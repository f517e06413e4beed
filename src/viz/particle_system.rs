use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::border::{border_position, inward_normal};
use super::primitives::{Color, Primitive};
use super::{bin_intensity, Viewport};

const PARTICLE_COUNT: usize = 50;
const MIN_SIZE: f32 = 2.0;
const BASE_DISTANCE: f32 = 150.0;
const FREQUENCY_IMPACT: f32 = 200.0;
const BASE_SPEED: f32 = 0.3;
const SPEED_INCREMENT: f32 = 0.2;
const WAVE_SPEED: f32 = 2.0;
const WAVE_AMPLITUDE: f32 = 30.0;
const SPIRAL_SPEED: f32 = 1.0;
const SPIRAL_AMPLITUDE: f32 = 20.0;
const LAYERS: usize = 3;
const LAYER_SPACING: f32 = 80.0;

const BORDER_DISTANCE: f32 = 30.0;
const BORDER_COUNT: usize = 120;
const BORDER_WAVE_SPEED: f32 = 3.0;
const BORDER_WAVE_COUNT: f32 = 3.0;
const BORDER_PULSE_SPEED: f32 = 2.0;
const BORDER_MOVEMENT: f32 = 25.0;

const SATURATION: f32 = 0.8;

/// Radial particle field in three counter-rotating layers, each particle
/// perturbed by wave and spiral terms driven by its spectrum bin, plus a
/// ring of border particles drifting along the window perimeter.
pub fn render(spectrum: &[f32], elapsed: f32, viewport: &Viewport) -> Vec<Primitive> {
    let mut primitives = Vec::with_capacity(LAYERS * PARTICLE_COUNT + BORDER_COUNT);
    let center = viewport.center();
    let wave_offset = elapsed * WAVE_SPEED;
    let spiral_offset = elapsed * SPIRAL_SPEED;

    for layer in 0..LAYERS {
        let layer_ratio = layer as f32 / (LAYERS - 1) as f32;
        let layer_distance = BASE_DISTANCE + layer as f32 * LAYER_SPACING;

        let direction = if layer % 2 == 0 { 1.0 } else { -1.0 };
        let speed = BASE_SPEED + layer as f32 * SPEED_INCREMENT;
        let layer_rotation = elapsed * speed * direction;

        for i in 0..PARTICLE_COUNT {
            let bin = i * spectrum.len() / PARTICLE_COUNT;
            let intensity = bin_intensity(spectrum, bin);

            let angle = TAU * i as f32 / PARTICLE_COUNT as f32 + layer_rotation;

            let wave = (angle * 3.0 * direction + wave_offset).sin() * WAVE_AMPLITUDE * intensity;
            let spiral =
                (spiral_offset * direction + i as f32 * 0.1).sin() * SPIRAL_AMPLITUDE * intensity;
            let distance = layer_distance + wave + spiral + intensity * FREQUENCY_IMPACT;

            let wobble = Vec2::new(
                (elapsed * 2.0 * direction + i as f32 + layer as f32).sin(),
                (elapsed * 2.0 * direction + i as f32 + layer as f32).cos(),
            ) * 10.0
                * intensity;

            let position = center + Vec2::new(angle.cos(), angle.sin()) * distance + wobble;
            let radius = MIN_SIZE + intensity * 20.0 * (1.0 + layer_ratio * 0.5);

            let hue_offset = layer_ratio * 0.3 * direction;
            let hue = i as f32 / PARTICLE_COUNT as f32 + hue_offset + elapsed / (5.0 + layer as f32);
            let value = (0.6 + intensity * 0.3).clamp(0.4, 0.9);

            primitives.push(Primitive::Circle {
                center: position,
                radius,
                color: Color::hsv(hue, SATURATION, value),
            });
        }
    }

    draw_border_particles(spectrum, elapsed, viewport, &mut primitives);
    primitives
}

/// Border ring: particles slide along the rounded perimeter while three
/// stacked waves, a pulse and a pinch of chaotic jitter push them in and
/// out of the frame edge.
fn draw_border_particles(
    spectrum: &[f32],
    elapsed: f32,
    viewport: &Viewport,
    primitives: &mut Vec<Primitive>,
) {
    let wave_offset = elapsed * WAVE_SPEED;
    let border_offset = elapsed * 0.3;

    for i in 0..BORDER_COUNT {
        let bin = i * spectrum.len() / BORDER_COUNT;
        let intensity = bin_intensity(spectrum, bin);

        let t = (i as f32 / BORDER_COUNT as f32 + border_offset).rem_euclid(1.0);
        let base = border_position(t, viewport, BORDER_DISTANCE);
        let inward = inward_normal(base, viewport);
        let along = Vec2::new(-inward.y, inward.x);

        let wave1 = (t * PI * BORDER_WAVE_COUNT * 2.0 + wave_offset * BORDER_WAVE_SPEED).sin();
        let wave2 =
            ((t + 0.25) * PI * BORDER_WAVE_COUNT + wave_offset * BORDER_WAVE_SPEED * 0.7).cos();
        let wave3 = (t * PI * 4.0 - wave_offset * BORDER_WAVE_SPEED * 1.3).sin();
        let combined =
            (wave1 + wave2 + wave3) / 3.0 * BORDER_MOVEMENT * (0.5 + intensity * 0.5);

        let pulse = (elapsed * BORDER_PULSE_SPEED + t * TAU).sin() * 10.0 * intensity;

        let chaos = Vec2::new(
            (elapsed * 3.0 + t * 7.0).sin(),
            (elapsed * 3.0 + t * 7.0).cos(),
        ) * intensity
            * 5.0;

        let position =
            base + inward * (combined + pulse) + along * (wave2 * intensity * 10.0) + chaos;

        let radius = MIN_SIZE * 1.5 + intensity * 15.0 + combined.abs() * 0.2;

        let wave_color = combined.abs() / (BORDER_MOVEMENT * 1.5) * 0.2;
        let hue = 1.0 - t + elapsed / 7.0 + wave_color;
        let value = (0.5 + intensity * 0.4 + wave_color).clamp(0.4, 0.9);

        primitives.push(Primitive::Circle {
            center: position,
            radius,
            color: Color::hsv(hue, SATURATION, value),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }

    #[test]
    fn particle_count_is_stable() {
        let spectrum = vec![0.3f32; 1024];
        let primitives = render(&spectrum, 2.0, &viewport());
        assert_eq!(primitives.len(), LAYERS * PARTICLE_COUNT + BORDER_COUNT);
    }

    #[test]
    fn silence_collapses_to_base_rings_not_nothing() {
        let spectrum = vec![0.0f32; 1024];
        let primitives = render(&spectrum, 0.0, &viewport());
        assert_eq!(primitives.len(), LAYERS * PARTICLE_COUNT + BORDER_COUNT);
        for p in &primitives[..LAYERS * PARTICLE_COUNT] {
            let Primitive::Circle { center, radius, .. } = p else {
                panic!("expected circles");
            };
            assert!((*radius - MIN_SIZE).abs() < 1e-5);
            let distance = (*center - viewport().center()).length();
            assert!(distance >= BASE_DISTANCE - 1e-3);
        }
    }

    #[test]
    fn positions_stay_finite_for_extreme_viewports() {
        let spectrum = vec![1.0f32; 1024];
        for (w, h) in [(1, 1), (4096, 2160)] {
            let vp = Viewport {
                width: w,
                height: h,
                fullscreen: false,
            };
            for p in render(&spectrum, 99.0, &vp) {
                let Primitive::Circle { center, radius, .. } = p else {
                    panic!("expected circles");
                };
                assert!(center.is_finite());
                assert!(radius.is_finite() && radius > 0.0);
            }
        }
    }
}
