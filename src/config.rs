//! Scene configuration.
//!
//! [`SceneConfig`] holds every tunable constant of the scene: camera, lights,
//! layout, animation and the starting values of the debug panel. The
//! defaults reproduce the reference scene; [`SceneConfig::from_env`] overlays
//! a few deployment knobs from the environment.

use std::{env, path::PathBuf};

use anyhow::{Context as _, bail};
use cgmath::{Deg, Vector3};

/// A model file placed in the scene together with the name attached to its mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelEntry {
    pub file: String,
    pub name: String,
}

impl ModelEntry {
    pub fn new(file: &str, name: &str) -> Self {
        Self {
            file: file.to_string(),
            name: name.to_string(),
        }
    }
}

/// Values driven by the debug panel. They feed the grain uniforms and the X
/// position of both spot lights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrainParams {
    pub noise_coef: f32,
    pub noise_min: f32,
    pub noise_max: f32,
    pub noise_scale: f32,
    pub light1_x: f32,
    pub light2_x: f32,
}

impl Default for GrainParams {
    fn default() -> Self {
        Self {
            noise_coef: 2.1,
            noise_min: 0.5,
            noise_max: 22.09,
            noise_scale: 0.8,
            light1_x: 10.0,
            light2_x: 10.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub fov: Deg<f32>,
    pub near: f32,
    pub far: f32,
    pub position: Vector3<f32>,
    pub auto_rotate: bool,
    /// Scales the auto rotation tick applied with each input-driven orbit update.
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: Deg(50.0),
            near: 0.1,
            far: 10000.0,
            position: Vector3::new(-11.7, 32.2, -7.1),
            auto_rotate: true,
            auto_rotate_speed: 2.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LightConfig {
    pub count: usize,
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Cone half angle.
    pub angle: Deg<f32>,
    pub penumbra: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            count: 2,
            position: Vector3::new(10.0, 10.0, 10.0),
            color: [1.0, 1.0, 1.0],
            intensity: 1.1,
            angle: Deg(60.0),
            penumbra: 0.0,
        }
    }
}

/// Ring placement of the boxes and the random scatter of the models.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    pub ring_slots: usize,
    pub ring_distance: f32,
    pub ring_height: f32,
    pub box_count: usize,
    pub box_scale: (f32, f32),
    pub model_x: (f32, f32),
    pub model_z: (f32, f32),
    pub model_yaw: Deg<f32>,
    pub brochure: ModelEntry,
    pub brochure_scale: f32,
    /// Euler angles applied in XYZ order.
    pub brochure_rotation: (Deg<f32>, Deg<f32>, Deg<f32>),
    /// Distance travelled along the brochure's own Y axis after rotating.
    pub brochure_lift: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ring_slots: 5,
            ring_distance: 6.0,
            ring_height: -2.0,
            box_count: 5,
            box_scale: (1.0, 3.0),
            model_x: (-15.0, 15.0),
            model_z: (-10.0, 10.0),
            model_yaw: Deg(-90.0),
            brochure: ModelEntry::new("brochureDisplaced.obj", "brochure"),
            brochure_scale: 0.5,
            brochure_rotation: (Deg(45.0), Deg(-90.0), Deg(65.0)),
            brochure_lift: -2.0,
        }
    }
}

/// Per-frame motion: mesh bobbing, mouse smoothing and container yaw.
#[derive(Clone, Debug)]
pub struct MotionConfig {
    pub bob_phase: f32,
    pub bob_magnitude: f32,
    pub bob_period_ms: f32,
    pub mouse_lerp: f32,
    pub container_yaw: Deg<f32>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            bob_phase: 5.0,
            bob_magnitude: 1.5,
            bob_period_ms: 500.0,
            mouse_lerp: 0.1,
            container_yaw: Deg(20.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub asset_dir: PathBuf,
    pub background: Option<String>,
    /// Used when the background image is missing.
    pub clear_colour: wgpu::Color,
    pub models: Vec<ModelEntry>,
    pub camera: CameraConfig,
    pub lights: LightConfig,
    pub layout: LayoutConfig,
    pub motion: MotionConfig,
    pub grain: GrainParams,
    /// Fixed seed for the random layout. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            background: Some("grey-gradient2.png".to_string()),
            clear_colour: wgpu::Color::WHITE,
            models: vec![
                ModelEntry::new("yarn.obj", "yarn"),
                ModelEntry::new("hellokitty.obj", "hellokitty"),
                ModelEntry::new("highheel.obj", "highheel"),
                ModelEntry::new("secretary.obj", "secretary"),
            ],
            camera: CameraConfig::default(),
            lights: LightConfig::default(),
            layout: LayoutConfig::default(),
            motion: MotionConfig::default(),
            grain: GrainParams::default(),
            seed: None,
        }
    }
}

impl SceneConfig {
    pub const ASSET_DIR_VAR: &'static str = "RISO_ASSET_DIR";
    pub const SEED_VAR: &'static str = "RISO_SEED";
    pub const AUTO_ROTATE_VAR: &'static str = "RISO_AUTO_ROTATE";

    /// Defaults overlaid with `RISO_ASSET_DIR`, `RISO_SEED` and `RISO_AUTO_ROTATE`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`. Malformed values are errors.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        if let Some(dir) = lookup(Self::ASSET_DIR_VAR) {
            if dir.trim().is_empty() {
                bail!("{} is set but empty", Self::ASSET_DIR_VAR);
            }
            self.asset_dir = PathBuf::from(dir);
        }
        if let Some(seed) = lookup(Self::SEED_VAR) {
            let seed = seed
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be an unsigned integer, got {seed:?}", Self::SEED_VAR))?;
            self.seed = Some(seed);
        }
        if let Some(flag) = lookup(Self::AUTO_ROTATE_VAR) {
            self.camera.auto_rotate = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => bail!("{} must be a boolean, got {other:?}", Self::AUTO_ROTATE_VAR),
            };
        }
        Ok(self)
    }
}
