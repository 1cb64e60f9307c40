//! Render composition.
//!
//! Flows describe what they want drawn with a [`Render`] value. The app
//! flattens the renders of every flow into one batch of [`Instanced`] meshes,
//! all drawn with the grain pipeline in batch order.

use crate::data_structures::{geometry::GpuMesh, scene_graph::SceneNode};

/// A mesh together with its instance buffer.
#[derive(Clone, Copy)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub mesh: &'a GpuMesh,
    pub amount: usize,
}

/// What a flow wants drawn this frame.
pub enum Render<'a> {
    None,
    Meshes(Vec<Instanced<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn collect_into(self, batch: &mut Vec<Instanced<'a>>) {
        if let Render::Meshes(mut meshes) = self {
            batch.append(&mut meshes);
        }
    }
}

/// Every uploaded mesh below `node`, parents first. Meshes that were never
/// written to the GPU are left out.
impl<'a> From<&'a dyn SceneNode> for Render<'a> {
    fn from(node: &'a dyn SceneNode) -> Self {
        let meshes = node.get_render();
        if meshes.is_empty() {
            Render::None
        } else {
            Render::Meshes(meshes)
        }
    }
}
