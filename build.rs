use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

// Models, the background gradient and fonts live in /assets/ and are mirrored
// into OUT_DIR so that packaged builds find them next to the artifacts.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/");
    println!("cargo:rerun-if-env-changed=RISO_ASSET_DIR");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if !assets.exists() {
        println!("cargo:warning=no assets/ directory, the scene will start without models");
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&[assets], out_dir, &copy_options)?;

    Ok(())
}
