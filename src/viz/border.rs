use glam::Vec2;

use super::Viewport;

/// Maps a parameter t in [0, 1) to a point on a rounded-corner path
/// inset `distance` pixels from the viewport edge. The path runs the
/// four straight edges first (top, right, bottom, left) and then the
/// four corner arcs, so equal steps in t cover equal arc length. Both
/// the wave border strip and the particle border ring sample it.
pub fn border_position(t: f32, viewport: &Viewport, distance: f32) -> Vec2 {
    let t = t.rem_euclid(1.0);
    let w = (viewport.width as f32 - 2.0 * distance).max(0.0);
    let h = (viewport.height as f32 - 2.0 * distance).max(0.0);

    let r = (w.min(h) * 0.1).max(0.0);
    // straight spans after carving out the corner radius
    let wa = (w - 2.0 * r).max(0.0);
    let ha = (h - 2.0 * r).max(0.0);

    let perimeter = 2.0 * (wa + ha) + 2.0 * std::f32::consts::PI * r;
    if perimeter <= f32::EPSILON {
        return Vec2::new(distance, distance);
    }

    let width = viewport.width as f32;
    let height = viewport.height as f32;
    let quarter_arc = r * std::f32::consts::FRAC_PI_2;
    let mut d = t * perimeter;

    // Top edge, left to right.
    if d < wa {
        return Vec2::new(distance + r + d, distance);
    }
    d -= wa;

    // Right edge, top to bottom.
    if d < ha {
        return Vec2::new(width - distance, distance + r + d);
    }
    d -= ha;

    // Bottom edge, right to left.
    if d < wa {
        return Vec2::new(width - distance - r - d, height - distance);
    }
    d -= wa;

    // Left edge, bottom to top.
    if d < ha {
        return Vec2::new(distance, height - distance - r - d);
    }
    d -= ha;

    // Corner arcs. With no corner radius left the edges cover the whole
    // perimeter and any residue is float noise.
    if r <= f32::EPSILON {
        return Vec2::new(distance + r, distance);
    }
    if d < quarter_arc {
        let angle = d / r;
        return Vec2::new(
            width - distance - r + r * angle.cos(),
            distance + r - r * angle.sin(),
        );
    }
    d -= quarter_arc;

    if d < quarter_arc {
        let angle = d / r;
        return Vec2::new(
            width - distance - r + r * angle.sin(),
            height - distance - r + r * angle.cos(),
        );
    }
    d -= quarter_arc;

    if d < quarter_arc {
        let angle = d / r;
        return Vec2::new(
            distance + r - r * angle.cos(),
            height - distance - r + r * angle.sin(),
        );
    }
    d -= quarter_arc;

    let angle = (d / r).min(std::f32::consts::FRAC_PI_2);
    Vec2::new(
        distance + r - r * angle.sin(),
        distance + r - r * angle.cos(),
    )
}

/// Unit vector pointing from the border point toward the viewport
/// center; border bars and particles are displaced along it.
pub fn inward_normal(point: Vec2, viewport: &Viewport) -> Vec2 {
    let center = Vec2::new(
        viewport.width as f32 / 2.0,
        viewport.height as f32 / 2.0,
    );
    let delta = center - point;
    if delta.length_squared() <= f32::EPSILON {
        return Vec2::new(0.0, 1.0);
    }
    delta.normalize()
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
    fn t_zero_sits_on_the_top_edge() {
        let vp = viewport(1280, 720);
        let p = border_position(0.0, &vp, 20.0);
        assert_eq!(p.y, 20.0);
        assert!(p.x > 20.0);
    }

    #[test]
    fn samples_stay_inside_the_inset_bounds() {
        let vp = viewport(1280, 720);
        for i in 0..512 {
            let t = i as f32 / 512.0;
            let p = border_position(t, &vp, 30.0);
            assert!(p.x >= 29.9 && p.x <= 1250.1, "x out of range at t={t}: {p:?}");
            assert!(p.y >= 29.9 && p.y <= 690.1, "y out of range at t={t}: {p:?}");
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn degenerate_viewport_yields_finite_points() {
        let vp = viewport(1, 1);
        for i in 0..32 {
            let t = i as f32 / 32.0;
            let p = border_position(t, &vp, 20.0);
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn parameter_wraps_around() {
        let vp = viewport(800, 600);
        let a = border_position(0.25, &vp, 20.0);
        let b = border_position(1.25, &vp, 20.0);
        assert!((a - b).length() < 1e-3);
    }

    #[test]
    fn normals_point_toward_the_center() {
        let vp = viewport(800, 600);
        let p = border_position(0.0, &vp, 20.0);
        let n = inward_normal(p, &vp);
        // top edge: inward is downward (+y in screen coordinates)
        assert!(n.y > 0.0);
    }
}
