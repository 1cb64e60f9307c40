use std::{collections::HashMap, path::PathBuf};

use riso_scene::SceneConfig;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_describe_the_scene() {
    let config = SceneConfig::default();
    let names: Vec<&str> = config.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["yarn", "hellokitty", "highheel", "secretary"]);
    assert_eq!(config.layout.brochure.file, "brochureDisplaced.obj");
    assert_eq!(config.lights.count, 2);
    assert_eq!(config.grain.noise_max, 22.09);
    assert!(config.camera.auto_rotate);
    assert_eq!(config.seed, None);
}

#[test]
fn overrides_replace_defaults() {
    let config = SceneConfig::default()
        .with_overrides(lookup(&[
            (SceneConfig::ASSET_DIR_VAR, "/tmp/riso"),
            (SceneConfig::SEED_VAR, " 1234 "),
            (SceneConfig::AUTO_ROTATE_VAR, "off"),
        ]))
        .expect("valid overrides");
    assert_eq!(config.asset_dir, PathBuf::from("/tmp/riso"));
    assert_eq!(config.seed, Some(1234));
    assert!(!config.camera.auto_rotate);
}

#[test]
fn missing_overrides_keep_defaults() {
    let config = SceneConfig::default()
        .with_overrides(lookup(&[]))
        .expect("nothing to override");
    assert_eq!(config.asset_dir, PathBuf::from("assets"));
    assert_eq!(config.seed, None);
}

#[test]
fn malformed_overrides_are_errors() {
    let seed = SceneConfig::default().with_overrides(lookup(&[(SceneConfig::SEED_VAR, "abc")]));
    assert!(format!("{:#}", seed.expect_err("bad seed")).contains("RISO_SEED"));

    let rotate =
        SceneConfig::default().with_overrides(lookup(&[(SceneConfig::AUTO_ROTATE_VAR, "maybe")]));
    assert!(format!("{:#}", rotate.expect_err("bad flag")).contains("RISO_AUTO_ROTATE"));

    let dir = SceneConfig::default().with_overrides(lookup(&[(SceneConfig::ASSET_DIR_VAR, " ")]));
    assert!(dir.is_err());
}
