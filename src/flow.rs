//! Flow control and the application event loop.
//!
//! A "flow" is a self-contained scene: it reacts to window input, updates its
//! state every frame and tells the app what to draw. The app owns the window
//! and the GPU [`Context`], forwards events to every flow and renders their
//! combined [`Render`] output each frame.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and the [`Context`], then awaits all flow
//!    constructors concurrently (models load in parallel)
//! 2. `on_init` lets each flow configure the context once
//! 3. Every window event goes to the orbit controls and `on_window_events`
//! 4. Every redraw calls `on_update`, applies pending orbit input and draws
//!    `on_render` of all flows, then requests the next redraw

use std::{pin::Pin, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config::SceneConfig,
    context::{Context, InitContext},
    data_structures::geometry::DrawMesh,
    render::{Instanced, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Output of a lifecycle hook.
///
/// `Out::Configure` runs a closure against the mutable [`Context`], for
/// instance to move the lights or update the material uniforms.
/// `Empty` is the default when nothing needs to change.
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

/// A renderable scene driven by the app.
pub trait GraphicsFlow {
    /// Called once after construction. The only hook with mutable access to the context.
    fn on_init(&mut self, ctx: &mut Context) -> Out;

    /// Called every frame before drawing. `now` is the time since the app
    /// started, `dt` the time since the previous frame.
    fn on_update(&mut self, ctx: &Context, now: Duration, dt: Duration) -> Out;

    /// Handle window events (keyboard, mouse, resizing).
    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) -> Out;

    /// What to draw this frame with the grain pipeline.
    fn on_render(&self) -> Render<'_>;

    /// Text drawn over the scene, if any.
    fn on_overlay(&self) -> Option<String> {
        None
    }
}

/// Factory for a flow. Constructors run concurrently once the GPU is ready.
pub type FlowConstructor = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow>>>>>,
>;

pub struct AppState {
    pub(crate) ctx: Context,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, scene: SceneConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, scene).await?;
        Ok(Self {
            ctx,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
        }
    }

    fn render(&mut self, graphics_flows: &[Box<dyn GraphicsFlow>]) -> Result<(), wgpu::SurfaceError> {
        // Keep drawing continuously
        self.ctx.window.request_redraw();

        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        #[cfg(feature = "ui")]
        let overlay = {
            let text: String = graphics_flows
                .iter()
                .filter_map(|flow| flow.on_overlay())
                .collect::<Vec<_>>()
                .join("\n");
            let (width, height) = (self.ctx.config.width, self.ctx.config.height);
            match self
                .ctx
                .overlay
                .prepare(&self.ctx.device, &self.ctx.queue, &text, width, height)
            {
                Ok(()) => !text.is_empty(),
                Err(e) => {
                    log::warn!("{e:#}");
                    false
                }
            }
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(background) = &self.ctx.background {
                background.draw(&mut render_pass);
            }

            let mut batch: Vec<Instanced> = Vec::new();
            graphics_flows
                .iter()
                .for_each(|flow| flow.on_render().collect_into(&mut batch));

            render_pass.set_pipeline(&self.ctx.grain_pipeline);
            render_pass.set_bind_group(0, &self.ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(1, &self.ctx.lights.bind_group, &[]);
            render_pass.set_bind_group(2, &self.ctx.grain.bind_group, &[]);
            for instanced in batch {
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    log::warn!("skipping {} with zero instances", instanced.mesh.name);
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_mesh_instanced(instanced.mesh, 0..instanced.amount as u32);
            }

            #[cfg(feature = "ui")]
            if overlay {
                if let Err(e) = self.ctx.overlay.render(&mut render_pass) {
                    log::warn!("{e:#}");
                }
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        #[cfg(feature = "ui")]
        self.ctx.overlay.trim();

        Ok(())
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    scene: Option<SceneConfig>,
    state: Option<AppState>,
    graphics_flows: Vec<Box<dyn GraphicsFlow>>,
    // Taken on first resume
    constructors: Option<Vec<FlowConstructor>>,
    started: Instant,
    last_time: Instant,
    frames: u64,
    frame_limit: Option<u64>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(
        event_loop: &EventLoop<FlowEvent>,
        scene: SceneConfig,
        constructors: Vec<FlowConstructor>,
        frame_limit: Option<u64>,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            scene: Some(scene),
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            started: Instant::now(),
            last_time: Instant::now(),
            frames: 0,
            frame_limit,
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn initialized(&mut self, mut state: AppState, flows: Vec<Box<dyn GraphicsFlow>>) {
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        self.graphics_flows = flows;
        for flow in self.graphics_flows.iter_mut() {
            let out = flow.on_init(&mut state.ctx);
            handle_flow_output(&mut state.ctx, out);
        }
        self.started = Instant::now();
        self.last_time = self.started;
        state.ctx.window.request_redraw();
        self.state = Some(state);
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized {
        state: AppState,
        flows: Vec<Box<dyn GraphicsFlow>>,
    },
    #[allow(dead_code)]
    Failed(anyhow::Error),
}

async fn initialize(
    window: Arc<Window>,
    scene: SceneConfig,
    constructors: Vec<FlowConstructor>,
) -> anyhow::Result<(AppState, Vec<Box<dyn GraphicsFlow>>)> {
    let app_state = AppState::new(window, scene).await?;
    let flow_futures: Vec<_> = constructors
        .into_iter()
        // Device and queue are reference counted, so this only clones handles
        .map(|constructor| constructor((&app_state.ctx).into()))
        .collect();
    let flows = futures::future::join_all(flow_futures)
        .await
        .into_iter()
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok((app_state, flows))
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(constructors), Some(scene)) = (self.constructors.take(), self.scene.take())
        else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("riso-scene");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let init_future = initialize(window, scene, constructors);

        #[cfg(not(target_arch = "wasm32"))]
        match self.async_runtime.block_on(init_future) {
            Ok((state, flows)) => self.initialized(state, flows),
            Err(e) => self.fail(event_loop, e.context("could not start the scene")),
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok((state, flows)) => FlowEvent::Initialized { state, flows },
                    Err(e) => FlowEvent::Failed(e),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("event loop closed before the scene was ready");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // Sent by the wasm `spawn_local` in `resumed`
            FlowEvent::Initialized { state, flows } => self.initialized(state, flows),
            FlowEvent::Failed(e) => self.fail(event_loop, e.context("could not start the scene")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controls.handle_window_events(&event);

        for flow in self.graphics_flows.iter_mut() {
            let out = flow.on_window_events(&state.ctx, &event);
            handle_flow_output(&mut state.ctx, out);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let now = self.started.elapsed();
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                for flow in self.graphics_flows.iter_mut() {
                    let out = flow.on_update(&state.ctx, now, dt);
                    handle_flow_output(&mut state.ctx, out);
                }
                let height = state.ctx.config.height as f32;
                state.ctx.camera.update(&state.ctx.queue, height);

                match state.render(&self.graphics_flows) {
                    Ok(()) => {
                        self.frames += 1;
                        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
                            log::info!("rendered {} frames, exiting", self.frames);
                            event_loop.exit();
                        }
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("unable to render: {e}");
                    }
                }
            }
            _ => {}
        }
    }
}

fn handle_flow_output(ctx: &mut Context, out: Out) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Empty => (),
    }
}

fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            eprintln!("Warning: could not initialize logger: {e}");
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("could not initialize logger: {e}").into());
        }
    }
}

fn run_app(
    scene: SceneConfig,
    constructors: Vec<FlowConstructor>,
    frame_limit: Option<u64>,
) -> anyhow::Result<()> {
    init_logging();

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(not(all(feature = "integration-tests", any(target_os = "linux", target_os = "windows"))))]
    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, scene, constructors, frame_limit)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Opens the window and runs the flows until the window is closed.
pub fn run(scene: SceneConfig, constructors: Vec<FlowConstructor>) -> anyhow::Result<()> {
    run_app(scene, constructors, None)
}

/// Like [`run`], but exits after `frames` frames were presented.
#[cfg(feature = "integration-tests")]
pub fn run_frames(
    scene: SceneConfig,
    constructors: Vec<FlowConstructor>,
    frames: u64,
) -> anyhow::Result<()> {
    run_app(scene, constructors, Some(frames))
}
