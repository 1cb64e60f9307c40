mod common;

#[cfg(feature = "integration-tests")]
#[test]
fn scene_renders_a_few_frames() {
    use common::fixtures::{QUAD_OBJ, seeded_config};
    use riso_scene::{GrainScene, flow};

    let _ = env_logger::builder().is_test(true).try_init();

    let dir = std::env::temp_dir().join(format!("riso-scene-smoke-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let mut config = seeded_config();
    for entry in config.models.iter().chain(std::iter::once(&config.layout.brochure)) {
        std::fs::write(dir.join(&entry.file), QUAD_OBJ).expect("write model");
    }
    // One model is missing on purpose and gets skipped
    std::fs::remove_file(dir.join(&config.models[0].file)).expect("remove model");
    config.asset_dir = dir.clone();
    config.background = None;

    let result = flow::run_frames(config, vec![GrainScene::constructor()], 5);
    let _ = std::fs::remove_dir_all(&dir);
    result.expect("scene rendered");
}
