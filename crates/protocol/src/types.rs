use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert an HSL triple (hue in degrees, saturation and lightness in
    /// `0.0..=1.0`) to an opaque RGB color.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        Self::rgba(r + m, g + m, b + m, 1.0)
    }

    /// 8-bit RGB components.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

/// The visible window onto the timeline canvas, in logical pixels.
///
/// `x` is the horizontal scroll offset into the canvas; `y` the vertical one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// Whether a canvas-space horizontal range `[left, right)` is at least
    /// partly visible.
    pub fn overlaps_x(&self, left: f64, right: f64) -> bool {
        right > self.x && left < self.x + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5).to_rgb8(), (255, 0, 0));
        assert_eq!(Color::from_hsl(120.0, 1.0, 0.5).to_rgb8(), (0, 255, 0));
        assert_eq!(Color::from_hsl(240.0, 1.0, 0.5).to_rgb8(), (0, 0, 255));
        assert_eq!(Color::from_hsl(0.0, 0.0, 1.0).to_rgb8(), (255, 255, 255));
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(
            Color::from_hsl(360.0, 0.7, 0.6).to_rgb8(),
            Color::from_hsl(0.0, 0.7, 0.6).to_rgb8()
        );
    }

    #[test]
    fn viewport_horizontal_visibility() {
        let vp = Viewport {
            x: 100.0,
            ..Viewport::new(200.0, 50.0)
        };
        assert!(vp.overlaps_x(50.0, 101.0));
        assert!(!vp.overlaps_x(50.0, 100.0));
        assert!(!vp.overlaps_x(300.0, 400.0));
    }
}
