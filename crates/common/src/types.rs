use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Upper bound applied to the device pixel ratio unless configured otherwise.
pub const DEFAULT_MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical size of a drawing surface in pixels. Both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Build a size, clamping zero dimensions (e.g. a minimized window) to 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Backing buffer size for the given pixel ratio.
    pub fn scaled(&self, pixel_ratio: f64) -> SurfaceSize {
        SurfaceSize::new(
            (self.width as f64 * pixel_ratio).round() as u32,
            (self.height as f64 * pixel_ratio).round() as u32,
        )
    }
}

/// `min(device, max)`, falling back to 1.0 for non-finite or non-positive ratios.
pub fn clamp_pixel_ratio(device_pixel_ratio: f64, max: f64) -> f64 {
    if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
        return 1.0;
    }
    device_pixel_ratio.min(max)
}

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_clamped() {
        let s = SurfaceSize::new(0, 0);
        assert_eq!(s, SurfaceSize::new(1, 1));
    }

    #[test]
    fn aspect_is_width_over_height() {
        let s = SurfaceSize::new(800, 600);
        assert!((s.aspect() - 800.0 / 600.0).abs() < f32::EPSILON);
    }

    #[test]
    fn scaled_rounds_and_never_hits_zero() {
        let s = SurfaceSize::new(801, 1);
        assert_eq!(s.scaled(1.5), SurfaceSize::new(1202, 2));
        assert_eq!(s.scaled(0.1), SurfaceSize::new(80, 1));
    }

    #[test]
    fn pixel_ratio_clamp() {
        assert_eq!(clamp_pixel_ratio(3.0, DEFAULT_MAX_PIXEL_RATIO), 2.0);
        assert_eq!(clamp_pixel_ratio(1.25, DEFAULT_MAX_PIXEL_RATIO), 1.25);
        assert_eq!(clamp_pixel_ratio(f64::NAN, DEFAULT_MAX_PIXEL_RATIO), 1.0);
        assert_eq!(clamp_pixel_ratio(0.0, DEFAULT_MAX_PIXEL_RATIO), 1.0);
    }

    #[test]
    fn hex_color() {
        assert_eq!(Color::from_hex(0xff0000), Color::RED);
        let c = Color::from_hex(0x336699);
        assert!((c.g - 0.4).abs() < 1e-6);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), glam::Mat4::IDENTITY);
    }
}
