//! Pointer picking on the CPU.
//!
//! A [`Raycaster`] shoots a ray from the camera through the pointer and
//! tests it against every mesh of the scene graph. Triangles facing away
//! from the ray are ignored, matching the culling of the grain pipeline.

use cgmath::{InnerSpace, Matrix4, Point3, SquareMatrix, Vector2, Vector3, Vector4};

use crate::{
    camera::PerspectiveCamera,
    data_structures::{
        geometry::{BoundingSphere, Geometry},
        scene_graph::{SceneNode, traverse},
    },
};

const EPSILON: f32 = 1e-8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Unit length.
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Ray parameter of the closest front facing hit, if any.
    pub fn intersect_triangle(&self, [a, b, c]: &[Vector3<f32>; 3]) -> Option<f32> {
        intersect_triangle(self.origin.to_homogeneous().truncate(), self.direction, a, b, c)
    }
}

/// Moller-Trumbore with back face culling. `direction` need not be unit length,
/// the result is in multiples of it.
fn intersect_triangle(
    origin: Vector3<f32>,
    direction: Vector3<f32>,
    a: &Vector3<f32>,
    b: &Vector3<f32>,
    c: &Vector3<f32>,
) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let h = direction.cross(edge2);
    let det = edge1.dot(h);
    if det < EPSILON {
        return None;
    }

    let f = 1.0 / det;
    let s = origin - a;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON).then_some(t)
}

fn hits_sphere(origin: Vector3<f32>, direction: Vector3<f32>, sphere: &BoundingSphere) -> bool {
    let oc = origin - sphere.center;
    let a = direction.magnitude2();
    let b = oc.dot(direction);
    let c = oc.magnitude2() - sphere.radius * sphere.radius;
    if c <= 0.0 {
        // Starts inside
        return true;
    }
    if b > 0.0 || a <= 0.0 {
        return false;
    }
    b * b - a * c >= 0.0
}

/// A mesh hit by the ray.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection {
    pub distance: f32,
    pub point: Point3<f32>,
    /// Name attached to the mesh, `None` for unnamed meshes.
    pub name: Option<String>,
}

impl Intersection {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

#[derive(Clone, Debug)]
pub struct Raycaster {
    pub ray: Option<Ray>,
    pub near: f32,
    pub far: f32,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Raycaster {
    pub fn new() -> Self {
        Self {
            ray: None,
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    /// Aims the ray from `camera` through `ndc`.
    pub fn set_from_camera(&mut self, ndc: Vector2<f32>, camera: &PerspectiveCamera) {
        self.ray = camera.ray_from_ndc(ndc);
    }

    /// Closest hit on `geometry` placed with `world`, in world units along the ray.
    pub fn intersect_geometry(&self, geometry: &Geometry, world: &Matrix4<f32>) -> Option<f32> {
        let ray = self.ray?;
        let inverse = world.invert()?;
        let origin = (inverse * ray.origin.to_homogeneous()).truncate();
        let direction = (inverse * Vector4::new(ray.direction.x, ray.direction.y, ray.direction.z, 0.0)).truncate();

        if !hits_sphere(origin, direction, &geometry.bounds()) {
            return None;
        }
        // Parameters stay valid across the affine transform, so t is a world distance
        geometry
            .triangles()
            .filter_map(|[a, b, c]| intersect_triangle(origin, direction, &a, &b, &c))
            .filter(|t| *t >= self.near && *t <= self.far)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Every mesh below `root` (inclusive) hit by the ray, nearest first.
    pub fn intersect_objects(&self, root: &dyn SceneNode) -> Vec<Intersection> {
        let Some(ray) = self.ray else {
            return Vec::new();
        };
        let mut hits = Vec::new();
        traverse(root, &mut |node| {
            let Some(geometry) = node.geometry() else {
                return;
            };
            let world = node.world_transform().to_matrix();
            if let Some(distance) = self.intersect_geometry(geometry, &world) {
                hits.push(Intersection {
                    distance,
                    point: ray.at(distance),
                    name: node.user_data().map(str::to_string),
                });
            }
        });
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
