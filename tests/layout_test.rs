mod common;

use cgmath::{Deg, InnerSpace, Rad, Vector3};
use common::fixtures::{assert_close, assert_vec_close};
use riso_scene::{
    config::{LayoutConfig, MotionConfig},
    layout::{self, LayoutPlan},
};

#[test]
fn ring_slots_are_spaced_evenly_on_the_circle() {
    let config = LayoutConfig::default();
    assert_vec_close(layout::ring_position(0, &config), Vector3::new(6.0, -2.0, 0.0));

    let step = Rad::from(Deg(72.0_f32)).0;
    assert_vec_close(
        layout::ring_position(1, &config),
        Vector3::new(6.0 * step.cos(), -2.0, 6.0 * step.sin()),
    );

    for slot in 0..config.ring_slots {
        let p = layout::ring_position(slot, &config);
        assert_close(Vector3::new(p.x, 0.0, p.z).magnitude(), config.ring_distance);
        assert_close(p.y, config.ring_height);
    }
    // Slots wrap after a full turn
    assert_vec_close(layout::ring_position(5, &config), layout::ring_position(0, &config));
}

#[test]
fn plan_has_one_box_per_model_then_the_standalone_boxes() {
    let config = LayoutConfig::default();
    let mut rng = layout::rng(Some(1));
    let plan = LayoutPlan::new(&mut rng, &config, 4);

    assert_eq!(plan.models.len(), 4);
    assert_eq!(plan.model_boxes.len(), 4);
    assert_eq!(plan.boxes.len(), config.box_count);
    assert_eq!(plan.box_count(), 9);

    let model_slots: Vec<usize> = plan.model_boxes.iter().map(|b| b.slot).collect();
    assert_eq!(model_slots, vec![0, 1, 2, 3]);
    let box_slots: Vec<usize> = plan.boxes.iter().map(|b| b.slot).collect();
    assert_eq!(box_slots, vec![0, 1, 2, 3, 4]);
}

#[test]
fn random_draws_stay_in_their_ranges() {
    let config = LayoutConfig::default();
    for seed in 0..20 {
        let mut rng = layout::rng(Some(seed));
        let plan = LayoutPlan::new(&mut rng, &config, 4);
        for placement in plan.model_boxes.iter().chain(plan.boxes.iter()) {
            let scale = placement.mesh.scale.x;
            assert!((1.0..3.0).contains(&scale), "box scale {scale}");
            assert_eq!(placement.mesh.scale, Vector3::new(scale, scale, scale));
            assert_vec_close(
                placement.container.position,
                layout::ring_position(placement.slot, &config),
            );
        }
        for model in &plan.models {
            assert!((-15.0..15.0).contains(&model.position.x));
            assert!((-10.0..10.0).contains(&model.position.z));
            assert_eq!(model.position.y, 0.0);
        }
    }
}

#[test]
fn same_seed_gives_the_same_plan() {
    let config = LayoutConfig::default();
    let a = LayoutPlan::new(&mut layout::rng(Some(42)), &config, 4);
    let b = LayoutPlan::new(&mut layout::rng(Some(42)), &config, 4);
    assert_eq!(a.models, b.models);
    assert_eq!(
        a.boxes.iter().map(|p| p.mesh).collect::<Vec<_>>(),
        b.boxes.iter().map(|p| p.mesh).collect::<Vec<_>>()
    );
}

#[test]
fn empty_range_yields_its_minimum() {
    let mut rng = layout::rng(Some(3));
    assert_eq!(layout::rand_float(&mut rng, (2.0, 2.0)), 2.0);
    assert_eq!(layout::rand_float(&mut rng, (5.0, 1.0)), 5.0);
}

#[test]
fn models_are_turned_a_quarter_to_the_right() {
    let config = LayoutConfig::default();
    let mut rng = layout::rng(Some(9));
    let model = layout::model_transform(&mut rng, &config);
    // -90 degrees about Y maps +X onto +Z
    assert_vec_close(model.rotation * Vector3::unit_x(), Vector3::unit_z());
}

#[test]
fn brochure_is_scaled_rotated_and_moved_along_its_own_axis() {
    let config = LayoutConfig::default();
    let brochure = layout::brochure_transform(&config);

    assert_eq!(brochure.scale, Vector3::new(0.5, 0.5, 0.5));
    // The lift ignores the scale
    assert_close(brochure.position.magnitude(), 2.0);
    assert_vec_close(
        brochure.position,
        brochure.rotation * Vector3::new(0.0, -2.0, 0.0),
    );
}

#[test]
fn bob_height_follows_time_and_pointer() {
    let motion = MotionConfig::default();
    assert_close(layout::bob_height(0.0, 0.0, &motion), 5.0f32.sin() * 1.5);
    assert_close(layout::bob_height(0.0, 0.5, &motion), 5.0f32.sin() * 1.5 - 0.5);
    assert_close(layout::bob_height(1000.0, 0.0, &motion), 7.0f32.sin() * 1.5);
}

#[test]
fn container_yaw_scales_with_pointer_x() {
    let motion = MotionConfig::default();
    assert_close(layout::container_yaw(1.0, &motion).0, Rad::from(Deg(20.0_f32)).0);
    assert_close(layout::container_yaw(-0.5, &motion).0, Rad::from(Deg(-10.0_f32)).0);
    assert_close(layout::container_yaw(0.0, &motion).0, 0.0);
}
