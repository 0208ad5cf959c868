use glam::{Mat4, Vec3};
use serde::Serialize;

/// Perspective camera with a cached projection matrix.
///
/// Aspect and clip planes are private so the projection can only change
/// through methods that recompute it; a render never sees a stale aspect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerspectiveCamera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    #[serde(skip)]
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            fov_degrees,
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Set the aspect ratio and recompute the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or(Vec3::X)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_tracks_aspect() {
        let mut cam = PerspectiveCamera::new(75.0, 800.0 / 600.0, 0.1, 100.0);
        let before = cam.projection_matrix();
        cam.set_aspect(2.0);
        let expected = Mat4::perspective_rh(75.0_f32.to_radians(), 2.0, 0.1, 100.0);
        assert_ne!(cam.projection_matrix(), before);
        assert_eq!(cam.projection_matrix(), expected);
    }

    #[test]
    fn view_projection_is_finite() {
        let cam =
            PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(Vec3::new(0.0, 0.0, 2.0));
        let vp = cam.view_projection();
        assert!(vp.is_finite());
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn basis_is_orthogonal() {
        let mut cam =
            PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0).with_position(Vec3::new(3.0, 2.0, 1.0));
        cam.look_at(Vec3::ZERO);
        assert!(cam.forward().dot(cam.right()).abs() < 1e-5);
        assert!(cam.forward().dot(cam.up()).abs() < 1e-5);
        assert!(cam.up().y > 0.0);
    }
}
