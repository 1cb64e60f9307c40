//! Loading of external files: OBJ meshes and images.
//!
//! Natively files are read relative to the configured asset directory. On
//! the web they are fetched from `<origin>/<asset dir>/`.

use std::{
    io::{BufReader, Cursor},
    path::Path,
};

use anyhow::{Context as _, bail};

use crate::data_structures::{geometry::Geometry, texture::Texture};

#[cfg(target_arch = "wasm32")]
fn format_url(root: &Path, file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no window available")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("could not read location origin: {e:?}"))?;
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, root.display()))?;
    Ok(base.join(file_name)?)
}

pub async fn load_string(root: &Path, file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(root, file_name)?;
        reqwest::get(url).await?.error_for_status()?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = {
        let path = root.join(file_name);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?
    };

    Ok(txt)
}

pub async fn load_binary(root: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(root, file_name)?;
        reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = root.join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?
    };

    Ok(data)
}

/// Parses OBJ text and returns the geometry of its first object. Material
/// references are ignored, every mesh uses the grain material.
pub fn parse_obj(name: &str, obj_text: &str) -> anyhow::Result<Geometry> {
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));
    let (models, _) = tobj::load_obj_buf(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )
    .with_context(|| format!("could not parse {name}"))?;

    let Some(first) = models.first() else {
        bail!("{name} contains no objects");
    };
    if models.len() > 1 {
        log::debug!("{name}: using {:?}, ignoring {} more objects", first.name, models.len() - 1);
    }
    let geometry = Geometry::from_obj_mesh(name, &first.mesh);
    if geometry.triangle_count() == 0 {
        bail!("{name} contains no faces");
    }
    log::debug!(
        "parsed {name}: {} vertices, {} triangles",
        geometry.vertices.len(),
        geometry.triangle_count()
    );

    Ok(geometry)
}

pub async fn load_obj_geometry(root: &Path, file_name: &str) -> anyhow::Result<Geometry> {
    let obj_text = load_string(root, file_name).await?;
    parse_obj(file_name, &obj_text)
}

pub async fn load_texture(
    root: &Path,
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(root, file_name).await?;
    Texture::from_bytes(device, queue, &data, file_name)
}
