//! Scene graph.
//!
//! A tree of boxed [`SceneNode`]s. [`ContainerNode`] only carries a transform
//! and children, [`MeshNode`] additionally draws a [`Geometry`] with the shared
//! grain material. World transforms are cached on every node and refreshed
//! from the root once per frame with [`SceneNode::update_world_transforms`].

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        geometry::{Geometry, GpuMesh},
        instance::Instance,
    },
    render::Instanced,
};

pub trait SceneNode {
    /// Name attached to the node, reported when the pointer ray hits it.
    fn user_data(&self) -> Option<&str>;

    fn local_transform(&self) -> &Instance;

    fn local_transform_mut(&mut self) -> &mut Instance;

    fn world_transform(&self) -> &Instance;

    /// `Some` for nodes that draw triangles.
    fn geometry(&self) -> Option<&Geometry>;

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    /// Recomputes the cached world transform of `self` and all descendants.
    fn update_world_transforms(&mut self, parent: &Instance);

    /// Uploads geometry on first use and the current world transform every call.
    fn write_to_buffers(&mut self, device: &wgpu::Device, queue: &wgpu::Queue);

    fn get_render(&self) -> Vec<Instanced<'_>>;
}

/// Visits `node` and every descendant depth-first, parents before children.
pub fn traverse_mut(node: &mut dyn SceneNode, visit: &mut dyn FnMut(&mut dyn SceneNode)) {
    visit(&mut *node);
    for child in node.get_children_mut().iter_mut() {
        traverse_mut(child.as_mut(), visit);
    }
}

pub fn traverse(node: &dyn SceneNode, visit: &mut dyn FnMut(&dyn SceneNode)) {
    visit(node);
    for child in node.get_children() {
        traverse(child.as_ref(), visit);
    }
}

/// Number of nodes below and including `node` that draw geometry.
pub fn count_meshes(node: &dyn SceneNode) -> usize {
    let mut count = 0;
    traverse(node, &mut |n| {
        if n.geometry().is_some() {
            count += 1;
        }
    });
    count
}

/// An empty transform grouping its children.
pub struct ContainerNode {
    pub children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
}

impl ContainerNode {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            local: Instance::default(),
            world: Instance::default(),
        }
    }

    pub fn with_transform(local: Instance) -> Self {
        Self {
            local,
            ..Self::new()
        }
    }
}

impl Default for ContainerNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode for ContainerNode {
    fn user_data(&self) -> Option<&str> {
        None
    }

    fn local_transform(&self) -> &Instance {
        &self.local
    }

    fn local_transform_mut(&mut self) -> &mut Instance {
        &mut self.local
    }

    fn world_transform(&self) -> &Instance {
        &self.world
    }

    fn geometry(&self) -> Option<&Geometry> {
        None
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    fn write_to_buffers(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(device, queue));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }
}

/// A drawable mesh. Geometry can be shared between nodes, GPU buffers are per node.
pub struct MeshNode {
    name: Option<String>,
    geometry: Arc<Geometry>,
    children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
    mesh: Option<GpuMesh>,
    instance_buffer: Option<wgpu::Buffer>,
}

impl MeshNode {
    pub fn new(geometry: Arc<Geometry>, local: Instance) -> Self {
        Self {
            name: None,
            geometry,
            children: Vec::new(),
            local,
            world: Instance::default(),
            mesh: None,
            instance_buffer: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

}

impl SceneNode for MeshNode {
    fn user_data(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn local_transform(&self) -> &Instance {
        &self.local
    }

    fn local_transform_mut(&mut self) -> &mut Instance {
        &mut self.local
    }

    fn world_transform(&self) -> &Instance {
        &self.world
    }

    fn geometry(&self) -> Option<&Geometry> {
        Some(self.geometry.as_ref())
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    fn write_to_buffers(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.mesh.is_none() {
            self.mesh = Some(self.geometry.upload(device));
        }
        let raw = [self.world.to_raw()];
        match &self.instance_buffer {
            Some(buffer) => queue.write_buffer(buffer, 0, bytemuck::cast_slice(&raw)),
            None => {
                self.instance_buffer = Some(device.create_buffer_init(
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Instance Buffer"),
                        contents: bytemuck::cast_slice(&raw),
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    },
                ))
            }
        }
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(device, queue));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        let own = match (&self.mesh, &self.instance_buffer) {
            (Some(mesh), Some(instance)) => Some(Instanced {
                instance,
                mesh,
                amount: 1,
            }),
            _ => None,
        };
        own.into_iter()
            .chain(self.children.iter().flat_map(|child| child.get_render()))
            .collect()
    }
}
