//! The grain scene.
//!
//! Builds the container with the ring boxes, the scattered models and the
//! brochure, then animates it every frame: the pointer is smoothed, a ray is
//! cast through the pointer and every mesh bobs and follows the pointer while
//! the container turns with it. The debug panel edits the grain uniforms and
//! the light positions.

use std::{path::Path, pin::Pin, sync::Arc};

use cgmath::{Quaternion, Rotation3};
use instant::Duration;
use winit::{
    event::{ElementState, WindowEvent},
    keyboard::ModifiersState,
};

use crate::{
    camera::PerspectiveCamera,
    config::{GrainParams, ModelEntry, SceneConfig},
    context::{Context, InitContext},
    data_structures::{
        geometry::Geometry,
        instance::Instance,
        scene_graph::{ContainerNode, MeshNode, SceneNode, traverse_mut},
    },
    flow::{FlowConstructor, GraphicsFlow, Out},
    layout::{self, BoxPlacement, LayoutPlan},
    panel::{DebugPanel, PanelKey},
    pick::{Intersection, Raycaster},
    pipelines::light::{SpotLight, set_light_x},
    pointer::PointerState,
    render::Render,
    resources,
};

/// Loaded geometry for the configured models, in configuration order.
/// Failed loads are kept as errors and skipped when building.
pub struct SceneAssets {
    pub models: Vec<anyhow::Result<Geometry>>,
    pub brochure: anyhow::Result<Geometry>,
}

impl SceneAssets {
    /// Loads every model and the brochure concurrently.
    pub async fn load(config: &SceneConfig) -> Self {
        let root: &Path = &config.asset_dir;
        let models = futures::future::join_all(
            config
                .models
                .iter()
                .map(|entry| resources::load_obj_geometry(root, &entry.file)),
        );
        let brochure = resources::load_obj_geometry(root, &config.layout.brochure.file);
        let (models, brochure) = futures::future::join(models, brochure).await;
        Self { models, brochure }
    }
}

fn box_node(placement: &BoxPlacement, cube: &Arc<Geometry>) -> Box<dyn SceneNode> {
    let mut container = ContainerNode::with_transform(placement.container);
    container.add_child(Box::new(MeshNode::new(cube.clone(), placement.mesh)));
    Box::new(container)
}

fn mesh_node(
    entry: &ModelEntry,
    geometry: anyhow::Result<Geometry>,
    transform: Instance,
    name: Option<&str>,
) -> Option<Box<dyn SceneNode>> {
    match geometry {
        Ok(geometry) => {
            let node = MeshNode::new(Arc::new(geometry), transform);
            let node = match name {
                Some(name) => node.named(name),
                None => node,
            };
            Some(Box::new(node))
        }
        Err(e) => {
            log::error!("skipping model {}: {e:#}", entry.file);
            None
        }
    }
}

/// Assembles the container: model boxes, standalone boxes, models, brochure.
pub fn build_container(config: &SceneConfig, plan: &LayoutPlan, assets: SceneAssets) -> ContainerNode {
    let cube = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
    let mut container = ContainerNode::new();

    for placement in plan.model_boxes.iter().chain(plan.boxes.iter()) {
        container.add_child(box_node(placement, &cube));
    }

    for ((entry, geometry), transform) in config
        .models
        .iter()
        .zip(assets.models)
        .zip(plan.models.iter().copied())
    {
        if let Some(node) = mesh_node(entry, geometry, transform, Some(&entry.name)) {
            container.add_child(node);
        }
    }

    // The brochure carries no name
    if let Some(node) = mesh_node(&config.layout.brochure, assets.brochure, plan.brochure, None) {
        container.add_child(node);
    }

    container.update_world_transforms(&Instance::new());
    container
}

/// Moves both lights to the X positions of the panel controller.
pub fn place_lights(lights: &mut [SpotLight], params: &GrainParams) {
    set_light_x(lights, 0, params.light1_x);
    set_light_x(lights, 1, params.light2_x);
}

/// Applies the whole panel controller to the material and both lights.
pub fn apply_params(ctx: &mut Context, params: &GrainParams) {
    ctx.grain.apply(&ctx.queue, params);
    place_lights(&mut ctx.lights.lights, params);
    ctx.lights.write(&ctx.queue);
}

pub struct GrainScene {
    config: SceneConfig,
    container: ContainerNode,
    pointer: PointerState,
    raycaster: Raycaster,
    panel: DebugPanel,
    hovered: Vec<String>,
    modifiers: ModifiersState,
}

impl GrainScene {
    pub fn from_parts(config: SceneConfig, plan: &LayoutPlan, assets: SceneAssets) -> Self {
        let container = build_container(&config, plan, assets);
        let panel = DebugPanel::new(config.grain);
        Self {
            config,
            container,
            pointer: PointerState::default(),
            raycaster: Raycaster::new(),
            panel,
            hovered: Vec::new(),
            modifiers: ModifiersState::empty(),
        }
    }

    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let config = init.scene;
        let mut rng = layout::rng(config.seed);
        let plan = LayoutPlan::new(&mut rng, &config.layout, config.models.len());
        let assets = SceneAssets::load(&config).await;
        let scene = Self::from_parts(config, &plan, assets);
        log::info!(
            "scene ready: {} meshes",
            crate::data_structures::scene_graph::count_meshes(&scene.container)
        );
        Ok(scene)
    }

    pub fn constructor() -> FlowConstructor {
        Box::new(|init: InitContext| {
            let scene: Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow>>>>> =
                Box::pin(async move {
                    let scene = GrainScene::new(init).await?;
                    Ok(Box::new(scene) as Box<dyn GraphicsFlow>)
                });
            scene
        })
    }

    pub fn container(&self) -> &ContainerNode {
        &self.container
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    pub fn panel(&self) -> &DebugPanel {
        &self.panel
    }

    /// Current hits of the pointer ray, nearest first.
    pub fn hovered(&self) -> &[String] {
        &self.hovered
    }

    /// Visits every mesh. Kept as the hook for per-model animation, it
    /// currently leaves all transforms untouched.
    pub fn animate_models(&mut self) {
        let mut meshes = 0;
        traverse_mut(&mut self.container, &mut |node| {
            if node.geometry().is_some() {
                meshes += 1;
            }
        });
        log::trace!("animate_models visited {meshes} meshes");
    }

    /// Casts the pointer ray, logs what it hits and remembers the hovered names.
    fn pick(&mut self, camera: &PerspectiveCamera) -> Vec<Intersection> {
        self.raycaster.set_from_camera(self.pointer.target, camera);
        let hits = self.raycaster.intersect_objects(&self.container);
        for hit in &hits {
            log::debug!("pointer over {} at {:.2}", hit.label(), hit.distance);
        }
        let hovered: Vec<String> = hits.iter().map(|hit| hit.label().to_string()).collect();
        if hovered != self.hovered {
            if hovered.is_empty() {
                log::info!("pointer over nothing");
            } else {
                log::info!("pointer over {}", hovered.join(", "));
            }
            self.hovered = hovered;
        }
        hits
    }

    /// One frame of scene motion at `now` since start. Returns the ray hits.
    pub fn advance(&mut self, now: Duration, camera: &PerspectiveCamera) -> Vec<Intersection> {
        let motion = self.config.motion.clone();
        self.pointer.smooth(motion.mouse_lerp);

        let hits = self.pick(camera);

        let now_ms = now.as_secs_f32() * 1000.0;
        let height = layout::bob_height(now_ms, self.pointer.smoothed.y, &motion);
        traverse_mut(&mut self.container, &mut |node| {
            if node.geometry().is_some() {
                node.local_transform_mut().position.y = height;
            }
        });

        let yaw = layout::container_yaw(self.pointer.smoothed.x, &motion);
        self.container.local_transform_mut().rotation = Quaternion::from_angle_y(yaw);
        self.container.update_world_transforms(&Instance::new());
        hits
    }

    fn panel_changed(&self, params: GrainParams) -> Out {
        if cfg!(not(feature = "ui")) {
            log::info!("panel:\n{}", self.panel.to_text());
        }
        Out::Configure(Box::new(move |ctx| apply_params(ctx, &params)))
    }

    /// Feeds a key press to the panel.
    pub fn handle_panel_key(&mut self, key: PanelKey) -> Option<GrainParams> {
        let before = self.panel.visible;
        let changed = self.panel.handle(key);
        if before != self.panel.visible {
            log::info!("panel {}", if self.panel.visible { "shown" } else { "hidden" });
        }
        changed
    }
}

impl GraphicsFlow for GrainScene {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        apply_params(ctx, self.panel.params());
        if cfg!(not(feature = "ui")) {
            log::info!("panel:\n{}", self.panel.to_text());
        }
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, now: Duration, _dt: Duration) -> Out {
        self.advance(now, &ctx.camera.camera);
        self.container.write_to_buffers(&ctx.device, &ctx.queue);
        Out::Empty
    }

    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) -> Out {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer
                    .handle_mouse_move(position.x, position.y, ctx.width(), ctx.height());
                Out::Empty
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                Out::Empty
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let key = PanelKey::from_key(&event.logical_key, self.modifiers.shift_key());
                match key.and_then(|key| self.handle_panel_key(key)) {
                    Some(params) => self.panel_changed(params),
                    None => Out::Empty,
                }
            }
            _ => Out::Empty,
        }
    }

    fn on_render(&self) -> Render<'_> {
        Render::from(&self.container as &dyn SceneNode)
    }

    fn on_overlay(&self) -> Option<String> {
        self.panel.visible.then(|| self.panel.to_text())
    }
}
