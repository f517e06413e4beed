use glam::Vec2;
use std::f32::consts::TAU;

use super::primitives::{Color, Primitive};
use super::{bin_intensity, Viewport};

const NUM_RINGS: usize = 25;
const POINTS_PER_RING: usize = 180;
const RING_SPACING: f32 = 25.0;
const FREQUENCY_IMPACT: f32 = 4000.0;
const LINE_THICKNESS: f32 = 2.0;
const ROTATION_SPEED: f32 = 0.5;
const COLOR_TIME_SPEED: f32 = 5.0;
const SATURATION: f32 = 0.8;

/// Receding tunnel of concentric rings. Rings are laid out outermost
/// first; each one reads a single spectrum bin that blows its radius
/// outward while one sinusoid ripples its vertices, and the whole
/// structure slowly rotates for the pseudo-3D pull.
pub fn render(spectrum: &[f32], elapsed: f32, viewport: &Viewport) -> Vec<Primitive> {
    let center = viewport.center();
    let rotation = elapsed * ROTATION_SPEED;

    let mut primitives = Vec::with_capacity(NUM_RINGS);
    for ring in 0..NUM_RINGS {
        let ring_radius = (NUM_RINGS - ring) as f32 * RING_SPACING;
        let bin = ring * spectrum.len() / NUM_RINGS;
        let intensity = bin_intensity(spectrum, bin);

        let mut points = Vec::with_capacity(POINTS_PER_RING);
        for i in 0..POINTS_PER_RING {
            let angle = TAU * i as f32 / POINTS_PER_RING as f32 + rotation;
            let ripple = (angle * 3.0 + rotation * 2.0).sin() * 20.0 * intensity;
            let distance = ring_radius + intensity * FREQUENCY_IMPACT + ripple;
            points.push(center + Vec2::new(angle.cos(), angle.sin()) * distance);
        }

        let hue = ring as f32 / NUM_RINGS as f32 + rotation / COLOR_TIME_SPEED;
        let value = (0.5 + intensity * 0.3).clamp(0.3, 0.8);

        primitives.push(Primitive::Polyline {
            points,
            closed: true,
            width: LINE_THICKNESS,
            color: Color::hsv(hue, SATURATION, value),
        });
    }
    primitives
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
    fn one_closed_ring_per_band() {
        let spectrum = vec![0.2f32; 1024];
        let primitives = render(&spectrum, 5.0, &viewport());
        assert_eq!(primitives.len(), NUM_RINGS);
        for p in &primitives {
            let Primitive::Polyline { points, closed, .. } = p else {
                panic!("expected polylines");
            };
            assert!(*closed);
            assert_eq!(points.len(), POINTS_PER_RING);
        }
    }

    #[test]
    fn silent_rings_sit_at_their_base_radius() {
        let spectrum = vec![0.0f32; 1024];
        let primitives = render(&spectrum, 0.0, &viewport());
        let Primitive::Polyline { points, .. } = &primitives[0] else {
            panic!("expected polylines");
        };
        let radius = (points[0] - viewport().center()).length();
        assert!((radius - NUM_RINGS as f32 * RING_SPACING).abs() < 1e-2);
    }

    #[test]
    fn excited_rings_expand() {
        let mut spectrum = vec![0.0f32; 1024];
        spectrum[0] = 1.0;
        let primitives = render(&spectrum, 0.0, &viewport());
        // ring 0 reads bin 0, which is the excited one
        let Primitive::Polyline { points, .. } = &primitives[0] else {
            panic!("expected polylines");
        };
        let radius = (points[0] - viewport().center()).length();
        assert!(radius > NUM_RINGS as f32 * RING_SPACING + FREQUENCY_IMPACT * 0.9);
    }
}
