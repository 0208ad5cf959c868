//! Damped orbit controls for rotating a camera around a target.
//!
//! The controls keep a *current* and a *goal* spherical position plus a
//! current and goal target. Pointer input only moves the goal. Each `update`
//! moves the current state a fixed fraction of the remaining distance toward
//! the goal (exponential decay), or jumps straight to it with damping off.

use crate::action::PointerAction;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use viewport_render::PerspectiveCamera;

/// Keeps the polar angle off the poles, where the view basis degenerates.
const POLE_EPS: f32 = 1e-6;
/// Remaining deltas below this snap to the goal.
const SETTLE_EPS: f32 = 1e-6;
/// Squared camera displacement below which an update counts as "no change".
const MOVE_EPS: f32 = 1e-6;

/// Tunables for [`OrbitControls`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub enable_damping: bool,
    /// Fraction of the remaining delta applied per update, in (0, 1].
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians from +Y.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

/// Spherical coordinates around +Y. Azimuth is measured from +Z toward +X.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Spherical {
    pub radius: f32,
    /// Angle from +Y, in radians.
    pub polar: f32,
    /// Angle around +Y, in radians. Never wrapped.
    pub azimuth: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            azimuth: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let ring = self.polar.sin() * self.radius;
        Vec3::new(
            ring * self.azimuth.sin(),
            self.polar.cos() * self.radius,
            ring * self.azimuth.cos(),
        )
    }
}

/// Orbit controls with optional exponential damping.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    settings: OrbitSettings,
    current: Spherical,
    goal: Spherical,
    target: Vec3,
    goal_target: Vec3,
}

impl OrbitControls {
    /// Bind controls to the camera's current position and target.
    pub fn new(camera: &PerspectiveCamera, settings: OrbitSettings) -> Self {
        let mut controls = Self {
            settings,
            current: Spherical::from_offset(camera.position - camera.target),
            goal: Spherical::default(),
            target: camera.target,
            goal_target: camera.target,
        };
        controls.current.polar = controls.clamp_polar(controls.current.polar);
        controls.current.radius = controls.clamp_radius(controls.current.radius);
        controls.goal = controls.current;
        tracing::debug!(
            distance = controls.current.radius,
            damping = settings.enable_damping,
            "orbit controls bound to camera"
        );
        controls
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    pub fn set_damping(&mut self, enabled: bool) {
        self.settings.enable_damping = enabled;
    }

    pub fn current(&self) -> Spherical {
        self.current
    }

    pub fn goal(&self) -> Spherical {
        self.goal
    }

    pub fn azimuth(&self) -> f32 {
        self.current.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.current.polar
    }

    pub fn distance(&self) -> f32 {
        self.current.radius
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// True once the current state has reached the goal.
    pub fn is_settled(&self) -> bool {
        self.current == self.goal && self.target == self.goal_target
    }

    /// Dispatch a pointer action. `viewport_height` is in logical pixels.
    pub fn apply(
        &mut self,
        action: PointerAction,
        camera: &PerspectiveCamera,
        viewport_height: f32,
    ) {
        match action {
            PointerAction::Rotate { dx, dy } => self.rotate_by_pixels(dx, dy, viewport_height),
            PointerAction::Pan { dx, dy } => self.pan_by_pixels(dx, dy, viewport_height, camera),
            PointerAction::Zoom(steps) => self.zoom(steps),
        }
    }

    /// Move the goal by angle deltas in radians.
    pub fn rotate(&mut self, delta_azimuth: f32, delta_polar: f32) {
        self.goal.azimuth += delta_azimuth;
        self.goal.polar = self.clamp_polar(self.goal.polar + delta_polar);
    }

    /// A drag across the full viewport height turns the camera once around.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        let speed = self.settings.rotate_speed;
        self.rotate(-TAU * dx / height * speed, -TAU * dy / height * speed);
    }

    /// Scale the goal distance by `0.95^(zoom_speed * steps)`.
    pub fn zoom(&mut self, steps: f32) {
        let scale = 0.95_f32.powf(self.settings.zoom_speed * steps);
        self.goal.radius = self.clamp_radius(self.goal.radius * scale);
    }

    /// Slide the goal target in the view plane so the scene follows the pointer.
    pub fn pan_by_pixels(
        &mut self,
        dx: f32,
        dy: f32,
        viewport_height: f32,
        camera: &PerspectiveCamera,
    ) {
        let height = viewport_height.max(1.0);
        let half_extent = self.current.radius * (camera.fov_degrees().to_radians() / 2.0).tan();
        let speed = self.settings.pan_speed;
        let left = -2.0 * dx * half_extent / height * speed;
        let up = 2.0 * dy * half_extent / height * speed;
        self.goal_target += camera.right() * left + camera.up() * up;
    }

    /// Advance one step and write the result into the camera.
    /// Returns whether the camera moved noticeably.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = camera.position;

        if self.settings.enable_damping {
            let f = self.settings.damping_factor;
            self.current.radius = ease(self.current.radius, self.goal.radius, f);
            self.current.polar = ease(self.current.polar, self.goal.polar, f);
            self.current.azimuth = ease(self.current.azimuth, self.goal.azimuth, f);
            let next = self.target + (self.goal_target - self.target) * f;
            self.target = if next.distance(self.goal_target) < SETTLE_EPS || next == self.target {
                self.goal_target
            } else {
                next
            };
        } else {
            self.current = self.goal;
            self.target = self.goal_target;
        }

        camera.position = self.target + self.current.to_offset();
        camera.look_at(self.target);
        camera.position.distance_squared(before) > MOVE_EPS
    }

    fn clamp_polar(&self, polar: f32) -> f32 {
        let lo = self.settings.min_polar_angle.max(POLE_EPS);
        let hi = self.settings.max_polar_angle.min(PI - POLE_EPS);
        polar.clamp(lo, hi.max(lo))
    }

    /// NaN limits count as unbounded.
    fn clamp_radius(&self, radius: f32) -> f32 {
        let lo = self.settings.min_distance.max(0.0);
        let hi = f32::INFINITY.min(self.settings.max_distance).max(lo);
        radius.clamp(lo, hi)
    }
}

/// One damping step. Snaps to the goal once close, or once the step is too
/// small to change the value at f32 precision.
fn ease(current: f32, goal: f32, factor: f32) -> f32 {
    let delta = goal - current;
    let next = current + delta * factor;
    if delta.abs() < SETTLE_EPS || next == current {
        goal
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 4.0 / 3.0, 0.1, 100.0)
            .with_position(Vec3::new(0.0, 0.0, 2.0))
    }

    fn damped() -> OrbitSettings {
        OrbitSettings {
            enable_damping: true,
            ..OrbitSettings::default()
        }
    }

    #[test]
    fn binds_to_camera_position() {
        let controls = OrbitControls::new(&camera(), damped());
        assert!((controls.distance() - 2.0).abs() < 1e-6);
        assert!((controls.polar() - PI / 2.0).abs() < 1e-6);
        assert_eq!(controls.azimuth(), 0.0);
        assert!(controls.is_settled());
    }

    #[test]
    fn spherical_offset_roundtrip() {
        let offset = Vec3::new(1.0, 2.0, -3.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!(back.distance(offset) < 1e-5);
    }

    #[test]
    fn damped_azimuth_converges_without_overshoot() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, damped());
        let goal = 90.0_f32.to_radians();
        controls.rotate(goal, 0.0);

        controls.update(&mut cam);
        let first = controls.azimuth();
        assert!((first - goal * 0.05).abs() < 1e-6);

        let mut prev = first;
        for _ in 0..400 {
            controls.update(&mut cam);
            let az = controls.azimuth();
            assert!(az >= prev);
            assert!(az <= goal + 1e-6);
            prev = az;
        }
        assert_eq!(controls.azimuth(), goal);
        assert!(controls.is_settled());
        // Azimuth 90 degrees puts the camera on +X looking at the origin.
        assert!((cam.position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-4);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn damped_negative_azimuth_converges_without_overshoot() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, damped());
        let goal = -std::f32::consts::FRAC_PI_2;
        controls.rotate(goal, 0.0);

        let mut prev = controls.azimuth();
        for _ in 0..400 {
            controls.update(&mut cam);
            let az = controls.azimuth();
            assert!(az <= prev);
            assert!(az >= goal - 1e-6);
            prev = az;
        }
        assert_eq!(controls.azimuth(), goal);
        assert!((cam.position - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn nan_distance_limits_do_not_collapse_the_orbit() {
        let mut cam = camera();
        for settings in [
            OrbitSettings { min_distance: f32::NAN, ..damped() },
            OrbitSettings { max_distance: f32::NAN, ..damped() },
        ] {
            let mut controls = OrbitControls::new(&cam, settings);
            controls.update(&mut cam);
            assert!((controls.distance() - 2.0).abs() < 1e-6);
            assert!((cam.position - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);
        }
    }

    #[test]
    fn undamped_snaps_to_goal() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, OrbitSettings::default());
        controls.rotate(1.0, 0.0);
        assert!(controls.update(&mut cam));
        assert_eq!(controls.azimuth(), 1.0);
        assert!(controls.is_settled());
        assert!(!controls.update(&mut cam));
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, OrbitSettings::default());
        controls.rotate(0.0, -10.0);
        controls.update(&mut cam);
        assert!(controls.polar() > 0.0);

        controls.rotate(0.0, 20.0);
        controls.update(&mut cam);
        assert!(controls.polar() < PI);
    }

    #[test]
    fn drag_maps_pixels_to_angles() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, OrbitSettings::default());
        // Dragging left by a quarter of the height turns a quarter circle.
        controls.apply(PointerAction::Rotate { dx: -150.0, dy: 0.0 }, &cam, 600.0);
        controls.update(&mut cam);
        assert!((controls.azimuth() - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut cam = camera();
        let settings = OrbitSettings {
            min_distance: 1.0,
            max_distance: 3.0,
            ..OrbitSettings::default()
        };
        let mut controls = OrbitControls::new(&cam, settings);

        controls.zoom(1.0);
        controls.update(&mut cam);
        assert!((controls.distance() - 1.9).abs() < 1e-5);

        controls.zoom(100.0);
        controls.update(&mut cam);
        assert_eq!(controls.distance(), 1.0);

        controls.zoom(-100.0);
        controls.update(&mut cam);
        assert_eq!(controls.distance(), 3.0);
    }

    #[test]
    fn pan_moves_target_in_view_plane() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, OrbitSettings::default());
        controls.apply(PointerAction::Pan { dx: 100.0, dy: 0.0 }, &cam, 600.0);
        controls.update(&mut cam);
        // Dragging right moves the target toward -X, keeping the orbit offset.
        assert!(controls.target().x < 0.0);
        assert!(controls.target().y.abs() < 1e-6);
        assert!(((cam.position - controls.target()).length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn damped_pan_eases_target() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, damped());
        controls.apply(PointerAction::Pan { dx: 0.0, dy: 60.0 }, &cam, 600.0);
        controls.update(&mut cam);
        let first = controls.target().y;
        assert!(first > 0.0);
        assert!(!controls.is_settled());
        for _ in 0..600 {
            controls.update(&mut cam);
        }
        assert!(controls.is_settled());
        assert!(controls.target().y > first);
    }
}
