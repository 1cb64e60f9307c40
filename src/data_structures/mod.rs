//! Scene data: geometry, transforms, textures and the scene graph.
//!
//! - `geometry` holds CPU triangle data and the uploaded GPU buffers
//! - `instance` holds per-object transforms and their GPU layout
//! - `scene_graph` organises containers and meshes hierarchically
//! - `texture` wraps GPU textures (depth buffer, background image)

pub mod geometry;
pub mod instance;
pub mod scene_graph;
pub mod texture;
