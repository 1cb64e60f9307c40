mod common;

use std::time::Duration;

use cgmath::{Deg, Quaternion, Rotation3, Vector2, Vector3};
use common::fixtures::{assert_close, assert_vec_close, assets_with_missing, quad, seeded_config};
use riso_scene::{
    GrainScene, SceneConfig,
    camera::PerspectiveCamera,
    config::ModelEntry,
    data_structures::{
        instance::Instance,
        scene_graph::{ContainerNode, MeshNode, SceneNode, count_meshes, traverse},
    },
    layout::{self, LayoutPlan},
    scene::{SceneAssets, build_container},
};

fn plan_for(config: &SceneConfig) -> LayoutPlan {
    LayoutPlan::new(&mut layout::rng(config.seed), &config.layout, config.models.len())
}

/// One quad at the origin facing a camera on +Z, no boxes.
fn facing_config() -> SceneConfig {
    let mut config = seeded_config();
    config.models = vec![ModelEntry::new("quad.obj", "quad")];
    config.layout.box_count = 0;
    config.layout.model_x = (0.0, 0.0);
    config.layout.model_z = (0.0, 0.0);
    config.layout.model_yaw = Deg(0.0);
    config.camera.position = Vector3::new(0.0, 0.0, 10.0);
    config
}

fn facing_camera(config: &SceneConfig) -> PerspectiveCamera {
    PerspectiveCamera::new(&config.camera, 800, 600)
}

#[test]
fn container_holds_boxes_models_and_brochure() {
    let config = seeded_config();
    let plan = plan_for(&config);
    let container = build_container(&config, &plan, assets_with_missing(&config, None));

    // 4 model boxes, 5 boxes, 4 models, 1 brochure
    assert_eq!(container.children.len(), 14);
    assert_eq!(count_meshes(&container), 14);

    let mut names = Vec::new();
    traverse(&container, &mut |node| {
        if let Some(name) = node.user_data() {
            names.push(name.to_string());
        }
    });
    assert_eq!(names, vec!["yarn", "hellokitty", "highheel", "secretary"]);
}

#[test]
fn boxes_sit_on_the_ring() {
    let config = seeded_config();
    let plan = plan_for(&config);
    let container = build_container(&config, &plan, assets_with_missing(&config, None));

    for (placement, node) in plan
        .model_boxes
        .iter()
        .chain(plan.boxes.iter())
        .zip(container.children.iter())
    {
        assert_vec_close(node.world_transform().position, placement.container.position);
        let mesh = &node.get_children()[0];
        assert_eq!(mesh.local_transform().scale, placement.mesh.scale);
        assert!(mesh.geometry().is_some());
    }
}

#[test]
fn failed_models_are_skipped() {
    let config = seeded_config();
    let plan = plan_for(&config);
    let container = build_container(&config, &plan, assets_with_missing(&config, Some(1)));
    assert_eq!(count_meshes(&container), 13);

    let mut names = Vec::new();
    traverse(&container, &mut |node| {
        if let Some(name) = node.user_data() {
            names.push(name.to_string());
        }
    });
    assert_eq!(names, vec!["yarn", "highheel", "secretary"]);

    let assets = SceneAssets {
        brochure: Err(anyhow::anyhow!("missing brochure")),
        ..assets_with_missing(&config, None)
    };
    let container = build_container(&config, &plan, assets);
    assert_eq!(count_meshes(&container), 13);
}

#[test]
fn advance_bobs_every_mesh_and_turns_the_container() {
    let config = seeded_config();
    let plan = plan_for(&config);
    let camera = PerspectiveCamera::new(&config.camera, 800, 600);
    let mut scene = GrainScene::from_parts(config.clone(), &plan, assets_with_missing(&config, None));

    scene.pointer_mut().target = Vector2::new(1.0, -0.5);
    scene.advance(Duration::from_secs(1), &camera);

    let smoothed = scene.pointer().smoothed;
    assert_close(smoothed.x, 0.1);
    assert_close(smoothed.y, -0.05);

    let height = layout::bob_height(1000.0, smoothed.y, &config.motion);
    let mut meshes = 0;
    traverse(scene.container(), &mut |node| {
        if node.geometry().is_some() {
            assert_close(node.local_transform().position.y, height);
            meshes += 1;
        }
    });
    assert_eq!(meshes, 14);

    let expected = Quaternion::from_angle_y(layout::container_yaw(0.1, &config.motion));
    let rotation = scene.container().local_transform().rotation;
    assert_close(rotation.s, expected.s);
    assert_close(rotation.v.y, expected.v.y);
    // World transforms follow the new local ones
    assert_close(scene.container().world_transform().rotation.v.y, rotation.v.y);
}

#[test]
fn advance_keeps_scatter_and_ring_positions_in_xz() {
    let config = seeded_config();
    let plan = plan_for(&config);
    let camera = PerspectiveCamera::new(&config.camera, 800, 600);
    let mut scene = GrainScene::from_parts(config.clone(), &plan, assets_with_missing(&config, None));
    scene.advance(Duration::from_millis(250), &camera);

    let models = &scene.container().children[9..13];
    for (node, transform) in models.iter().zip(plan.models.iter()) {
        assert_eq!(node.local_transform().position.x, transform.position.x);
        assert_eq!(node.local_transform().position.z, transform.position.z);
    }
}

#[test]
fn pointer_ray_reports_the_named_mesh() {
    let config = facing_config();
    let plan = plan_for(&config);
    let assets = SceneAssets {
        models: vec![Ok(quad())],
        brochure: Err(anyhow::anyhow!("no brochure")),
    };
    let camera = facing_camera(&config);
    let mut scene = GrainScene::from_parts(config, &plan, assets);

    let hits = scene.advance(Duration::ZERO, &camera);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].label(), "quad");
    assert_close(hits[0].distance, 10.0);
    assert_eq!(scene.hovered().to_vec(), vec!["quad".to_string()]);

    // Aim well off to the side
    scene.pointer_mut().target = Vector2::new(0.9, 0.9);
    let hits = scene.advance(Duration::ZERO, &camera);
    assert!(hits.is_empty());
    assert!(scene.hovered().is_empty());
}

#[test]
fn unnamed_meshes_are_reported_without_a_name() {
    let config = facing_config();
    let root = {
        let mut root = ContainerNode::new();
        root.add_child(Box::new(MeshNode::new(std::sync::Arc::new(quad()), Instance::new())));
        root.update_world_transforms(&Instance::new());
        root
    };
    let mut caster = riso_scene::pick::Raycaster::new();
    caster.set_from_camera(Vector2::new(0.0, 0.0), &facing_camera(&config));
    let hits = caster.intersect_objects(&root);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, None);
    assert_eq!(hits[0].label(), "<unnamed>");
}

#[test]
fn panel_keys_reach_the_panel() {
    let config = seeded_config();
    let plan = plan_for(&config);
    let mut scene = GrainScene::from_parts(config.clone(), &plan, assets_with_missing(&config, None));

    let params = scene
        .handle_panel_key(riso_scene::panel::PanelKey::Decrease)
        .expect("light1X changes");
    assert_close(params.light1_x, 9.9);
    assert_eq!(scene.panel().params(), &params);

    scene.handle_panel_key(riso_scene::panel::PanelKey::ToggleVisible);
    assert!(!scene.panel().visible);
}

#[test]
fn panel_edits_move_both_lights_along_x() {
    use riso_scene::{
        config::LightConfig,
        panel::{Control, DebugPanel},
        pipelines::light::SpotLight,
        scene::place_lights,
    };

    let config = seeded_config();
    let mut lights: Vec<SpotLight> = (0..2)
        .map(|_| SpotLight::from_config(&LightConfig::default()))
        .collect();
    let mut panel = DebugPanel::new(config.grain);

    let params = panel.set(Control::Light1X, -3.0).expect("light1X changes");
    place_lights(&mut lights, &params);
    assert_eq!(lights[0].position, Vector3::new(-3.0, 10.0, 10.0));
    assert_eq!(lights[1].position, Vector3::new(10.0, 10.0, 10.0));

    let params = panel.set(Control::Light2X, 4.5).expect("light2X changes");
    place_lights(&mut lights, &params);
    assert_eq!(lights[0].position.x, -3.0);
    assert_eq!(lights[1].position.x, 4.5);
    // Aim follows the new position
    assert!(lights[1].direction().x < 0.0);

    // A single light ignores the second slider
    let mut single = vec![SpotLight::from_config(&LightConfig::default())];
    place_lights(&mut single, &params);
    assert_eq!(single[0].position.x, -3.0);
}
