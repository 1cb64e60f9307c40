//! Text overlay for the debug panel, drawn with glyphon on top of the scene.

use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
};

use crate::data_structures::texture::DEPTH_FORMAT;

const MARGIN: f32 = 12.0;

pub struct TextOverlay {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    buffer: Buffer,
    text: String,
}

impl TextOverlay {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        // The scene pass has a depth attachment, text ignores it
        let renderer = TextRenderer::new(
            &mut atlas,
            device,
            wgpu::MultisampleState::default(),
            Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
        );
        let buffer = Buffer::new(&mut font_system, Metrics::new(14.0, 18.0));

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            renderer,
            buffer,
            text: String::new(),
        }
    }

    /// Lays out `text` for a `width` x `height` viewport. Only reshapes when the text changed.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        text: &str,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        self.viewport.update(queue, Resolution { width, height });
        if self.text != text {
            self.buffer.set_size(
                &mut self.font_system,
                Some(width as f32 - 2.0 * MARGIN),
                Some(height as f32 - 2.0 * MARGIN),
            );
            self.buffer.set_text(
                &mut self.font_system,
                text,
                &Attrs::new().family(Family::Monospace),
                Shaping::Advanced,
                None,
            );
            self.buffer.shape_until_scroll(&mut self.font_system, false);
            self.text = text.to_string();
        }

        self.renderer
            .prepare(
                device,
                queue,
                &mut self.font_system,
                &mut self.atlas,
                &self.viewport,
                [TextArea {
                    buffer: &self.buffer,
                    left: MARGIN,
                    top: MARGIN,
                    scale: 1.0,
                    bounds: TextBounds {
                        left: 0,
                        top: 0,
                        right: width as i32,
                        bottom: height as i32,
                    },
                    default_color: Color::rgb(20, 20, 20),
                    custom_glyphs: &[],
                }],
                &mut self.swash_cache,
            )
            .map_err(|e| anyhow::anyhow!("could not prepare panel text: {e}"))
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass) -> anyhow::Result<()> {
        self.renderer
            .render(&self.atlas, &self.viewport, render_pass)
            .map_err(|e| anyhow::anyhow!("could not draw panel text: {e}"))
    }

    /// Frees atlas space held by glyphs no longer on screen.
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}
