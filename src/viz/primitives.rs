use glam::Vec2;

/// RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Hue wraps; saturation and value are clamped. The visualization
    /// routines lean almost entirely on this for their cycling palettes.
    pub fn hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let h = hue.rem_euclid(1.0);
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);

        if s <= 0.0 {
            return Self::rgb(v, v, v);
        }

        let sector = h * 6.0;
        let i = sector.floor() as i32 % 6;
        let f = sector - sector.floor();
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match i {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// One frame's worth of drawing is a flat list of these. Routines build
/// primitives in screen coordinates (origin top-left, y down) and the
/// graphics engine tessellates them into triangles.
#[derive(Debug, Clone)]
pub enum Primitive {
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    /// Consecutive points joined by line segments; `closed` joins the
    /// last point back to the first.
    Polyline {
        points: Vec<Vec2>,
        closed: bool,
        width: f32,
        color: Color,
    },
    Rect {
        origin: Vec2,
        size: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn hsv_primaries() {
        let red = Color::hsv(0.0, 1.0, 1.0);
        assert!(close(red.r, 1.0) && close(red.g, 0.0) && close(red.b, 0.0));

        let green = Color::hsv(1.0 / 3.0, 1.0, 1.0);
        assert!(close(green.r, 0.0) && close(green.g, 1.0) && close(green.b, 0.0));

        let blue = Color::hsv(2.0 / 3.0, 1.0, 1.0);
        assert!(close(blue.r, 0.0) && close(blue.g, 0.0) && close(blue.b, 1.0));
    }

    #[test]
    fn hsv_hue_wraps() {
        let a = Color::hsv(0.25, 0.8, 0.9);
        let b = Color::hsv(1.25, 0.8, 0.9);
        let c = Color::hsv(-0.75, 0.8, 0.9);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn zero_saturation_is_gray() {
        let gray = Color::hsv(0.37, 0.0, 0.5);
        assert!(close(gray.r, 0.5) && close(gray.g, 0.5) && close(gray.b, 0.5));
    }
}
