//! Mesh geometry on the CPU and its GPU buffers.
//!
//! [`Geometry`] keeps positions, normals and indices in memory because the
//! pointer ray is tested against the triangles every frame. [`GpuMesh`] is
//! the uploaded copy used for drawing.

use std::ops::Range;

use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Sphere enclosing every vertex, used to reject rays early.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vector3<f32>,
    pub radius: f32,
}

/// Triangle list geometry.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    bounds: BoundingSphere,
}

impl Geometry {
    pub fn new(name: &str, vertices: Vec<ModelVertex>, indices: Vec<u32>) -> Self {
        let bounds = bounding_sphere(&vertices);
        Self {
            name: name.to_string(),
            vertices,
            indices,
            bounds,
        }
    }

    /// Axis aligned box centered on the origin with one normal per face.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
        // normal, u axis, v axis per face
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let half = Vector3::new(hx, hy, hz);
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let n = Vector3::from(normal);
            let u = Vector3::from(u);
            let v = Vector3::from(v);
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = n + u * su + v * sv;
                let p = Vector3::new(p.x * half.x, p.y * half.y, p.z * half.z);
                vertices.push(ModelVertex {
                    position: p.into(),
                    tex_coords: [(su + 1.0) / 2.0, (1.0 - sv) / 2.0],
                    normal,
                });
            }
            // counter-clockwise when looking at the face from outside
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self::new("cuboid", vertices, indices)
    }

    /// Builds geometry from a parsed OBJ mesh. Missing normals are derived
    /// from the faces.
    pub fn from_obj_mesh(name: &str, mesh: &tobj::Mesh) -> Self {
        let mut vertices = (0..mesh.positions.len() / 3)
            .map(|i| ModelVertex {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                tex_coords: [
                    mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
                normal: [
                    mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                    mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                    mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                ],
            })
            .collect::<Vec<_>>();
        if mesh.normals.is_empty() {
            compute_normals(&mut vertices, &mesh.indices);
        }
        Self::new(name, vertices, mesh.indices.clone())
    }

    pub fn bounds(&self) -> BoundingSphere {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corners of every triangle in model space.
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f32>; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|c| {
            let a = self.vertices.get(c[0] as usize)?;
            let b = self.vertices.get(c[1] as usize)?;
            let c = self.vertices.get(c[2] as usize)?;
            Some([a.position.into(), b.position.into(), c.position.into()])
        })
    }

    pub fn upload(&self, device: &wgpu::Device) -> GpuMesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        GpuMesh {
            name: self.name.clone(),
            vertex_buffer,
            index_buffer,
            num_elements: self.indices.len() as u32,
        }
    }
}

fn bounding_sphere(vertices: &[ModelVertex]) -> BoundingSphere {
    if vertices.is_empty() {
        return BoundingSphere {
            center: Vector3::new(0.0, 0.0, 0.0),
            radius: 0.0,
        };
    }
    let mut min = Vector3::from(vertices[0].position);
    let mut max = min;
    for v in vertices {
        min.x = min.x.min(v.position[0]);
        min.y = min.y.min(v.position[1]);
        min.z = min.z.min(v.position[2]);
        max.x = max.x.max(v.position[0]);
        max.y = max.y.max(v.position[1]);
        max.z = max.z.max(v.position[2]);
    }
    let center = (min + max) / 2.0;
    let radius = vertices
        .iter()
        .map(|v| (Vector3::from(v.position) - center).magnitude())
        .fold(0.0, f32::max);
    BoundingSphere { center, radius }
}

fn compute_normals(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut sums = vec![Vector3::new(0.0, 0.0, 0.0); vertices.len()];
    for c in indices.chunks_exact(3) {
        let (i0, i1, i2) = (c[0] as usize, c[1] as usize, c[2] as usize);
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }
        let p0 = Vector3::from(vertices[i0].position);
        let p1 = Vector3::from(vertices[i1].position);
        let p2 = Vector3::from(vertices[i2].position);
        // area weighted
        let face = (p1 - p0).cross(p2 - p0);
        sums[i0] += face;
        sums[i1] += face;
        sums[i2] += face;
    }
    for (vertex, sum) in vertices.iter_mut().zip(sums) {
        if sum.magnitude2() > f32::EPSILON {
            vertex.normal = sum.normalize().into();
        }
    }
}

/// Vertex and index buffers of an uploaded [`Geometry`].
#[derive(Debug)]
pub struct GpuMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

pub trait DrawMesh<'a> {
    fn draw_mesh_instanced(&mut self, mesh: &'a GpuMesh, instances: Range<u32>);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(&mut self, mesh: &'b GpuMesh, instances: Range<u32>) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }
}
