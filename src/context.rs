use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{CameraResources, OrbitControls, PerspectiveCamera},
    config::SceneConfig,
    data_structures::texture::DepthTexture,
    pipelines::{
        background::BackgroundResources, basic::mk_grain_pipeline, grain::GrainResources,
        light::LightResources,
    },
    resources,
};

/// The GPU side of the application: surface, device, shared uniforms and pipelines.
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: DepthTexture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub lights: LightResources,
    pub grain: GrainResources,
    pub background: Option<BackgroundResources>,
    pub grain_pipeline: wgpu::RenderPipeline,
    /// Shown where no background image is drawn.
    pub clear_colour: wgpu::Color,
    pub scene: SceneConfig,
    #[cfg(feature = "ui")]
    pub(crate) overlay: crate::ui::TextOverlay,
}

/// What a flow constructor gets to build its resources with.
#[derive(Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub scene: SceneConfig,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            scene: ctx.scene.clone(),
        }
    }
}

impl Context {
    pub async fn new(window: Arc<Window>, scene: SceneConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("wgpu setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("could not open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colour, so prefer an sRGB surface
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = PerspectiveCamera::new(&scene.camera, config.width, config.height);
        let controls = OrbitControls::new(&scene.camera);
        let camera = CameraResources::new(&device, camera, controls);

        let depth_texture = DepthTexture::new(&device, [config.width, config.height]);

        let lights = LightResources::new(&device, &scene.lights);
        let grain = GrainResources::new(&device, &scene.grain);
        let grain_pipeline = mk_grain_pipeline(
            &device,
            config.format,
            &camera.bind_group_layout,
            &lights.bind_group_layout,
            &grain.bind_group_layout,
        );

        let background = match &scene.background {
            Some(file) => {
                match resources::load_texture(&scene.asset_dir, file, &device, &queue).await {
                    Ok(texture) => Some(BackgroundResources::new(&device, config.format, texture)),
                    Err(e) => {
                        log::warn!("background {file} unavailable, using the clear colour: {e:#}");
                        None
                    }
                }
            }
            None => None,
        };

        #[cfg(feature = "ui")]
        let overlay = crate::ui::TextOverlay::new(&device, &queue, config.format);

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            lights,
            grain,
            background,
            grain_pipeline,
            clear_colour: scene.clear_colour,
            scene,
            #[cfg(feature = "ui")]
            overlay,
        })
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Reconfigures the surface, the depth buffer and the camera aspect.
    /// Zero sizes are ignored.
    pub(crate) fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.camera.camera.resize(width, height);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::new(&self.device, [width, height]);
        true
    }
}
