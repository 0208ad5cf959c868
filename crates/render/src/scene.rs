use glam::{Mat4, Vec3};
use viewport_common::{Color, Transform};

/// Axis-aligned box centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxGeometry {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

impl Default for BoxGeometry {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// Unlit material: every fragment gets the same color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: BoxGeometry,
    pub material: BasicMaterial,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: BoxGeometry, material: BasicMaterial) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::default(),
        }
    }

    /// Model matrix of a unit cube stretched to the geometry's size.
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix() * Mat4::from_scale(self.geometry.size())
    }
}

/// What the renderer draws: a background and a flat list of meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Color,
    meshes: Vec<Mesh>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: Color::BLACK,
            meshes: Vec::new(),
        }
    }

    /// The demo scene: one 1x1x1 cube with a basic material.
    pub fn single_cube(color: Color) -> Self {
        let mut scene = Self::new();
        scene.add(Mesh::new(BoxGeometry::default(), BasicMaterial { color }));
        scene
    }

    pub fn add(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cube_scene() {
        let scene = Scene::single_cube(Color::RED);
        assert_eq!(scene.meshes().len(), 1);
        assert_eq!(scene.meshes()[0].material.color, Color::RED);
        assert_eq!(scene.meshes()[0].geometry.size(), Vec3::ONE);
    }

    #[test]
    fn model_matrix_applies_geometry_size() {
        let mut mesh = Mesh::new(
            BoxGeometry::new(2.0, 1.0, 1.0),
            BasicMaterial { color: Color::RED },
        );
        mesh.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let corner = mesh.model_matrix().transform_point3(Vec3::splat(0.5));
        assert_eq!(corner, Vec3::new(2.0, 0.5, 0.5));
    }
}
