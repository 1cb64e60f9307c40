//! Render pipelines and the uniforms they read.
//!
//! - `basic`: pipeline construction and the grain pipeline
//! - `grain`: the shared grain material uniform
//! - `light`: spot lights
//! - `background`: the full screen background image

pub mod background;
pub mod basic;
pub mod grain;
pub mod light;
