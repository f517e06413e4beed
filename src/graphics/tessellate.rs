use glam::Vec2;

use crate::viz::primitives::{Color, Primitive};
use super::Vertex;

/// Flattens one frame's draw primitives into a triangle list. The
/// pipeline draws with alpha blending and no culling, so winding order
/// does not matter here.
pub fn tessellate(primitives: &[Primitive], out: &mut Vec<Vertex>) {
    out.clear();
    for primitive in primitives {
        match primitive {
            Primitive::Line {
                from,
                to,
                width,
                color,
            } => line(out, *from, *to, *width, *color),
            Primitive::Polyline {
                points,
                closed,
                width,
                color,
            } => {
                for pair in points.windows(2) {
                    line(out, pair[0], pair[1], *width, *color);
                }
                if *closed && points.len() > 2 {
                    line(out, points[points.len() - 1], points[0], *width, *color);
                }
            }
            Primitive::Rect {
                origin,
                size,
                color,
            } => rect(out, *origin, *size, *color),
            Primitive::Circle {
                center,
                radius,
                color,
            } => circle(out, *center, *radius, *color),
        }
    }
}

fn push_triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: Color) {
    let color = color.to_array();
    out.push(Vertex {
        position: a.to_array(),
        color,
    });
    out.push(Vertex {
        position: b.to_array(),
        color,
    });
    out.push(Vertex {
        position: c.to_array(),
        color,
    });
}

fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: Color) {
    let tangent = to - from;
    if tangent.length_squared() <= f32::EPSILON {
        return;
    }
    let normal = Vec2::new(-tangent.y, tangent.x).normalize() * (width.max(1.0) / 2.0);

    let a = from + normal;
    let b = to + normal;
    let c = to - normal;
    let d = from - normal;
    push_triangle(out, a, b, c, color);
    push_triangle(out, a, c, d, color);
}

fn rect(out: &mut Vec<Vertex>, origin: Vec2, size: Vec2, color: Color) {
    // normalize so negative sizes cannot produce inside-out quads
    let min = origin.min(origin + size);
    let max = origin.max(origin + size);
    if (max - min).length_squared() <= f32::EPSILON {
        return;
    }
    let a = min;
    let b = Vec2::new(max.x, min.y);
    let c = max;
    let d = Vec2::new(min.x, max.y);
    push_triangle(out, a, b, c, color);
    push_triangle(out, a, c, d, color);
}

fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Color) {
    if radius <= 0.0 {
        return;
    }
    let segments = (radius as usize).clamp(12, 48);
    let mut previous = center + Vec2::new(radius, 0.0);
    for i in 1..=segments {
        let angle = std::f32::consts::TAU * i as f32 / segments as f32;
        let next = center + Vec2::new(angle.cos(), angle.sin()) * radius;
        push_triangle(out, center, previous, next, color);
        previous = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_becomes_a_quad() {
        let mut out = Vec::new();
        tessellate(
            &[Primitive::Line {
                from: Vec2::ZERO,
                to: Vec2::new(10.0, 0.0),
                width: 2.0,
                color: Color::rgb(1.0, 0.0, 0.0),
            }],
            &mut out,
        );
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn degenerate_line_is_dropped() {
        let mut out = Vec::new();
        tessellate(
            &[Primitive::Line {
                from: Vec2::new(5.0, 5.0),
                to: Vec2::new(5.0, 5.0),
                width: 2.0,
                color: Color::rgb(1.0, 1.0, 1.0),
            }],
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn closed_polyline_joins_back_to_the_start() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let mut open = Vec::new();
        tessellate(
            &[Primitive::Polyline {
                points: square.clone(),
                closed: false,
                width: 1.0,
                color: Color::rgb(0.0, 1.0, 0.0),
            }],
            &mut open,
        );
        let mut closed = Vec::new();
        tessellate(
            &[Primitive::Polyline {
                points: square,
                closed: true,
                width: 1.0,
                color: Color::rgb(0.0, 1.0, 0.0),
            }],
            &mut closed,
        );
        assert_eq!(open.len(), 3 * 6);
        assert_eq!(closed.len(), 4 * 6);
    }

    #[test]
    fn negative_rect_sizes_are_normalized() {
        let mut out = Vec::new();
        tessellate(
            &[Primitive::Rect {
                origin: Vec2::new(10.0, 10.0),
                size: Vec2::new(-5.0, -5.0),
                color: Color::rgb(0.0, 0.0, 1.0),
            }],
            &mut out,
        );
        assert_eq!(out.len(), 6);
        for vertex in &out {
            assert!(vertex.position[0] >= 5.0 && vertex.position[0] <= 10.0);
        }
    }

    #[test]
    fn circle_fan_size_follows_radius() {
        let mut small = Vec::new();
        circle(&mut small, Vec2::ZERO, 2.0, Color::rgb(1.0, 1.0, 1.0));
        assert_eq!(small.len(), 12 * 3);

        let mut large = Vec::new();
        circle(&mut large, Vec2::ZERO, 400.0, Color::rgb(1.0, 1.0, 1.0));
        assert_eq!(large.len(), 48 * 3);
    }

    #[test]
    fn buffer_is_cleared_between_frames() {
        let mut out = vec![Vertex {
            position: [0.0, 0.0],
            color: [0.0; 4],
        }];
        tessellate(&[], &mut out);
        assert!(out.is_empty());
    }
}
