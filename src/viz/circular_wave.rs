use glam::Vec2;
use std::f32::consts::TAU;

use super::border::{border_position, inward_normal};
use super::primitives::{Color, Primitive};
use super::{bin_intensity, Viewport};

const NUM_POINTS: usize = 180;
const BASE_RADIUS: f32 = 150.0;
const FREQUENCY_IMPACT: f32 = 100.0;
const LAYERS: usize = 4;
const LAYER_SPACING: f32 = 40.0;
const BASE_ROTATION_SPEED: f32 = 0.3;
const ROTATION_SPEED_INCREMENT: f32 = 0.2;
const MOVEMENT_SPEED: f32 = 2.0;
const MOVEMENT_SPEED_INCREMENT: f32 = 0.5;
const BASE_THICKNESS: f32 = 3.0;

const BORDER_DISTANCE: f32 = 20.0;
const BORDER_SEGMENTS: usize = 100;
const BORDER_HEIGHT: f32 = 30.0;
const BORDER_SPACING: f32 = 2.0;
const BORDER_SPEED: f32 = 1.5;

const SATURATION: f32 = 0.8;

/// Concentric layered waves around the viewport center. Alternating
/// layers rotate in opposite directions at increasing speed; each point
/// radius combines three sinusoids scaled by its spectrum bin. The line
/// thickness is built from offset passes whose alpha fades toward the
/// edges. A reactive bar strip hugs the window border.
pub fn render(spectrum: &[f32], elapsed: f32, viewport: &Viewport) -> Vec<Primitive> {
    let mut primitives = Vec::new();
    let center = viewport.center();

    for layer in 0..LAYERS {
        let layer_ratio = layer as f32 / (LAYERS - 1) as f32;
        let base_radius = BASE_RADIUS + layer as f32 * LAYER_SPACING;

        let direction = if layer % 2 == 0 { 1.0 } else { -1.0 };
        let rotation_speed = BASE_ROTATION_SPEED + layer as f32 * ROTATION_SPEED_INCREMENT;
        let movement_speed = MOVEMENT_SPEED + layer as f32 * MOVEMENT_SPEED_INCREMENT;

        let rotation = elapsed * rotation_speed * direction;
        let movement = elapsed * movement_speed * direction;

        // One pass over the ring, intensity kept per point for coloring.
        let mut points: Vec<(Vec2, f32)> = Vec::with_capacity(NUM_POINTS + 1);
        for i in 0..NUM_POINTS {
            let angle = TAU * i as f32 / NUM_POINTS as f32 + rotation;
            let bin = i * spectrum.len() / NUM_POINTS;
            let intensity = bin_intensity(spectrum, bin);

            let wave1 = (angle * 3.0 + movement).sin() * (20.0 + layer as f32 * 5.0) * intensity;
            let wave2 =
                (angle * 5.0 - movement * 0.7).cos() * (15.0 + layer as f32 * 3.0) * intensity;
            let wave3 =
                (angle * 7.0 + movement * 1.3).sin() * (10.0 + layer as f32 * 2.0) * intensity;

            let radius = base_radius
                + wave1
                + wave2
                + wave3
                + intensity * FREQUENCY_IMPACT * (1.0 + layer_ratio * 0.5);

            let point = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            points.push((point, intensity));
        }
        points.push(points[0]);

        let thickness = (BASE_THICKNESS * (1.0 + layer_ratio)).max(1.0) as usize;
        for pass in 0..thickness {
            let pass_ratio = pass as f32 / thickness as f32;
            let alpha = 1.0 - pass_ratio * 0.7;
            let offset = (pass as f32 - thickness as f32 / 2.0) * 0.5;

            for segment in points.windows(2) {
                let (p1, i1) = segment[0];
                let (p2, i2) = segment[1];
                let tangent = p2 - p1;
                if tangent.length_squared() <= f32::EPSILON {
                    continue;
                }
                let normal = Vec2::new(-tangent.y, tangent.x).normalize();

                let intensity = (i1 + i2) / 2.0;
                let hue = layer_ratio + elapsed / (5.0 + layer as f32 * 2.0);
                let value = (0.6 + intensity * 0.3).clamp(0.4, 0.9);
                let color = Color::hsv(hue, SATURATION, value).with_alpha(alpha);

                primitives.push(Primitive::Line {
                    from: p1 + normal * offset,
                    to: p2 + normal * offset,
                    width: 1.0,
                    color,
                });
            }
        }
    }

    draw_border_bars(spectrum, elapsed, viewport, &mut primitives);
    primitives
}

/// Edge-hugging reactive bars along the rounded-corner perimeter.
fn draw_border_bars(
    spectrum: &[f32],
    elapsed: f32,
    viewport: &Viewport,
    primitives: &mut Vec<Primitive>,
) {
    let perimeter_span = 2.0 * (viewport.width as f32 + viewport.height as f32);
    let bar_width =
        (perimeter_span / BORDER_SEGMENTS as f32 - BORDER_SPACING).clamp(1.0, 24.0);
    let border_offset = elapsed * BORDER_SPEED;

    for i in 0..BORDER_SEGMENTS {
        let t = i as f32 / BORDER_SEGMENTS as f32;

        // Interpolate between neighbouring bins for a smoother strip.
        let position = t * spectrum.len() as f32;
        let bin = position as usize;
        let blend = position.fract();
        let intensity =
            bin_intensity(spectrum, bin) * (1.0 - blend) + bin_intensity(spectrum, bin + 1) * blend;

        let wave = (t * std::f32::consts::PI * 8.0 + border_offset).sin() * 0.3 + 0.7;
        let height = BORDER_HEIGHT * intensity * wave;
        if height < 0.5 {
            continue;
        }

        let base = border_position(t, viewport, BORDER_DISTANCE);
        let inward = inward_normal(base, viewport);

        let hue = t + border_offset / 10.0;
        let value = (0.5 + intensity * 0.4).clamp(0.4, 0.9);
        primitives.push(Primitive::Line {
            from: base,
            to: base + inward * height,
            width: bar_width,
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
    fn silence_keeps_the_base_rings() {
        let spectrum = vec![0.0f32; 1024];
        let primitives = render(&spectrum, 0.0, &viewport());
        // four layers of ring segments survive with zero intensity
        assert!(primitives.len() >= LAYERS * NUM_POINTS);
    }

    #[test]
    fn loud_spectrum_pushes_points_outward() {
        let quiet = vec![0.0f32; 1024];
        let loud = vec![1.0f32; 1024];
        let base = render(&quiet, 0.0, &viewport());
        let excited = render(&loud, 0.0, &viewport());
        let max_distance = |prims: &[Primitive]| {
            prims
                .iter()
                .filter_map(|p| match p {
                    Primitive::Line { from, .. } => {
                        Some((*from - viewport().center()).length())
                    }
                    _ => None,
                })
                .fold(0.0f32, f32::max)
        };
        assert!(max_distance(&excited) > max_distance(&base));
    }

    #[test]
    fn all_positions_are_finite() {
        let mut spectrum = vec![0.0f32; 1024];
        spectrum[3] = 1.0;
        for p in render(&spectrum, 42.0, &viewport()) {
            if let Primitive::Line { from, to, .. } = p {
                assert!(from.is_finite() && to.is_finite());
            }
        }
    }
}
