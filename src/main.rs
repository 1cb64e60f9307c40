use riso_scene::SceneConfig;

fn main() -> anyhow::Result<()> {
    riso_scene::run(SceneConfig::from_env()?)
}
