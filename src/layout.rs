//! Placement of the ring boxes, the scattered models and the brochure, plus
//! the per-frame motion formulas.
//!
//! Everything here is plain math on [`Instance`]s so the layout can be built
//! and checked without a GPU.

use cgmath::{Deg, Rad, Vector3};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config::{LayoutConfig, MotionConfig},
    data_structures::instance::Instance,
};

/// A box on the ring: the outer transform is the ring position, the inner
/// one the mesh inside it carrying the random scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxPlacement {
    pub slot: usize,
    pub container: Instance,
    pub mesh: Instance,
}

/// Every transform of the scene, drawn in the same order as the scene builds it.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPlan {
    /// One box per model, on ring slots 0, 1, ...
    pub model_boxes: Vec<BoxPlacement>,
    /// Local transforms of the models, same order as the configured model list.
    pub models: Vec<Instance>,
    /// The standalone boxes, restarting at ring slot 0.
    pub boxes: Vec<BoxPlacement>,
    pub brochure: Instance,
}

/// Seeded when `seed` is given, otherwise from OS entropy.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform draw from `[min, max)`. An empty range yields `min`.
pub fn rand_float(rng: &mut impl Rng, (min, max): (f32, f32)) -> f32 {
    if min < max {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Ring slots advance by `360° / ring_slots` starting at angle 0 on +X.
pub fn ring_position(slot: usize, layout: &LayoutConfig) -> Vector3<f32> {
    let step = Rad::from(Deg(360.0 / layout.ring_slots.max(1) as f32));
    let angle = step.0 * slot as f32;
    Vector3::new(
        angle.cos() * layout.ring_distance,
        layout.ring_height,
        angle.sin() * layout.ring_distance,
    )
}

pub fn box_placement(slot: usize, scale: f32, layout: &LayoutConfig) -> BoxPlacement {
    BoxPlacement {
        slot,
        container: Instance::from(ring_position(slot, layout)),
        mesh: Instance::new().with_scale(scale),
    }
}

/// Random X/Z scatter at height 0, turned about Y.
pub fn model_transform(rng: &mut impl Rng, layout: &LayoutConfig) -> Instance {
    let z = rand_float(rng, layout.model_z);
    let x = rand_float(rng, layout.model_x);
    let mut instance = Instance::from(Vector3::new(x, 0.0, z));
    instance.rotate_y(layout.model_yaw);
    instance
}

/// Scaled, rotated in XYZ order and then moved along its own Y axis.
pub fn brochure_transform(layout: &LayoutConfig) -> Instance {
    let (x, y, z) = layout.brochure_rotation;
    let mut instance = Instance::new().with_scale(layout.brochure_scale);
    instance.rotation = Instance::euler_xyz(x, y, z);
    instance.translate_on_axis(Vector3::unit_y(), layout.brochure_lift);
    instance
}

impl LayoutPlan {
    pub fn new(rng: &mut impl Rng, layout: &LayoutConfig, model_count: usize) -> Self {
        let mut model_boxes = Vec::with_capacity(model_count);
        let mut models = Vec::with_capacity(model_count);
        for slot in 0..model_count {
            let scale = rand_float(rng, layout.box_scale);
            model_boxes.push(box_placement(slot, scale, layout));
            models.push(model_transform(rng, layout));
        }

        let boxes = (0..layout.box_count)
            .map(|slot| {
                let scale = rand_float(rng, layout.box_scale);
                box_placement(slot, scale, layout)
            })
            .collect();

        Self {
            model_boxes,
            models,
            boxes,
            brochure: brochure_transform(layout),
        }
    }

    pub fn box_count(&self) -> usize {
        self.model_boxes.len() + self.boxes.len()
    }
}

/// Height every mesh is set to at `now_ms`.
pub fn bob_height(now_ms: f32, mouse_y: f32, motion: &MotionConfig) -> f32 {
    (motion.bob_phase + now_ms / motion.bob_period_ms).sin() * motion.bob_magnitude - mouse_y
}

/// Yaw of the container for the smoothed pointer X.
pub fn container_yaw(mouse_x: f32, motion: &MotionConfig) -> Rad<f32> {
    Rad::from(motion.container_yaw * mouse_x)
}
