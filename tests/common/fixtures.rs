use cgmath::{InnerSpace, Vector3};
use riso_scene::{
    SceneConfig,
    data_structures::geometry::Geometry,
    resources::parse_obj,
    scene::SceneAssets,
};

pub const EPS: f32 = 1e-4;

/// A unit quad in the XY plane facing +Z, without normals.
pub const QUAD_OBJ: &str = "\
o quad
v -0.5 -0.5 0.0
v 0.5 -0.5 0.0
v 0.5 0.5 0.0
v -0.5 0.5 0.0
f 1 2 3 4
";

/// Two objects with explicit normals and texture coordinates.
pub const TWO_TRIANGLES_OBJ: &str = "\
o first
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
o second
v 0.0 0.0 5.0
v 1.0 0.0 5.0
v 0.0 1.0 5.0
f 4/1/1 5/2/1 6/3/1
";

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_vec_close(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert!(
        (actual - expected).magnitude() < EPS,
        "expected {expected:?}, got {actual:?}"
    );
}

/// Defaults with a fixed seed so layouts are reproducible.
pub fn seeded_config() -> SceneConfig {
    SceneConfig {
        seed: Some(7),
        ..SceneConfig::default()
    }
}

pub fn quad() -> Geometry {
    parse_obj("quad.obj", QUAD_OBJ).expect("quad fixture parses")
}

/// Assets for every configured model, with the model at `missing` failing to load.
pub fn assets_with_missing(config: &SceneConfig, missing: Option<usize>) -> SceneAssets {
    let models = (0..config.models.len())
        .map(|i| {
            if Some(i) == missing {
                Err(anyhow::anyhow!("could not read {}", config.models[i].file))
            } else {
                Ok(Geometry::cuboid(1.0, 1.0, 1.0))
            }
        })
        .collect();
    SceneAssets {
        models,
        brochure: Ok(quad()),
    }
}
