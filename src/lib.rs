//! riso-scene
//!
//! An interactive 3D scene rendered with a risograph-like grain shader.
//! OBJ models and boxes are laid out around the origin, lit by two spot
//! lights and gently moved by the mouse, while the camera orbits the scene.
//! A small keyboard driven panel tunes the grain and the light positions.
//! Runs natively and in the browser (WebGL).
//!
//! High-level modules
//! - `camera`: perspective camera, orbit controls and the camera uniform
//! - `config`: every tunable constant of the scene plus environment overrides
//! - `context`: GPU and window context that owns device, queue and pipelines
//! - `data_structures`: geometry, transforms, textures and the scene graph
//! - `flow`: the flow trait and the application event loop
//! - `layout`: ring, scatter and motion math
//! - `panel`: the debug panel model
//! - `pick`: CPU raycasting against scene meshes
//! - `pipelines`: grain material, spot lights and background rendering
//! - `pointer`: mouse to NDC mapping and smoothing
//! - `render`: render composition
//! - `resources`: loading OBJ files and images
//! - `scene`: the grain scene itself
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod layout;
pub mod panel;
pub mod pick;
pub mod pipelines;
pub mod pointer;
pub mod render;
pub mod resources;
pub mod scene;
#[cfg(feature = "ui")]
pub mod ui;

pub use config::SceneConfig;
pub use scene::GrainScene;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Runs the grain scene until its window is closed.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    flow::run(config, vec![GrainScene::constructor()])
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run(SceneConfig::default()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
