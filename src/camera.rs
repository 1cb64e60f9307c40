//! Perspective camera, orbit controls and the camera uniform.
//!
//! The camera always looks at the orbit target (the scene origin by default).
//! [`OrbitControls`] accumulates mouse input between frames and applies it in
//! [`OrbitControls::update`]. Without input the camera stays where it is.

use std::f32::consts::PI;

use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector2, Vector3, Vector4};
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use crate::{config::CameraConfig, pick::Ray};

/// cgmath builds OpenGL clip space (z in -1..1), wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view.
    pub fov: Deg<f32>,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Point3::new(config.position.x, config.position.y, config.position.z),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            fov: config.fov,
            aspect: 1.0,
            near: config.near,
            far: config.far,
        };
        camera.resize(width, height);
        camera
    }

    /// Updates the aspect ratio. Degenerate sizes (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// World space ray from the camera through a point in normalised device
    /// coordinates (x right, y up, both in -1..1).
    pub fn ray_from_ndc(&self, ndc: Vector2<f32>) -> Option<Ray> {
        let inverse = self.view_proj().invert()?;
        let clip = inverse * Vector4::new(ndc.x, ndc.y, 0.5, 1.0);
        if clip.w.abs() <= f32::EPSILON {
            return None;
        }
        let point = Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);
        let direction = point - self.position;
        if direction.magnitude2() <= f32::EPSILON {
            return None;
        }
        Some(Ray::new(self.position, direction.normalize()))
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &PerspectiveCamera) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = camera.view_proj().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: PerspectiveCamera, controls: OrbitControls) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controls,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Applies pending orbit input and uploads the resulting view projection.
    pub fn update(&mut self, queue: &wgpu::Queue, viewport_height: f32) {
        self.controls.update(&mut self.camera, viewport_height);
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Drag {
    Rotate,
    Pan,
}

/// Keeps the camera on a sphere around `target`.
///
/// Primary button drags rotate, secondary button drags pan and the wheel
/// dollies. The camera only moves when input is pending. With `auto_rotate`
/// every such update also turns it by one tick of
/// `2π / 3600 · auto_rotate_speed`, unless a drag is active.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits measured from +Y.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    // Pan is stored in pixels and resolved against the camera in `update`
    pending_pan: Vector2<f32>,
    drag: Option<Drag>,
    last_cursor: Option<PhysicalPosition<f64>>,
    // Set by input between updates, consumed by `update`
    pending_rotate: Vector2<f32>,
    pending: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Point3::new(0.0, 0.0, 0.0),
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pending_pan: Vector2::new(0.0, 0.0),
            drag: None,
            last_cursor: None,
            pending_rotate: Vector2::new(0.0, 0.0),
            pending: false,
        }
    }
}

impl OrbitControls {
    const EPS: f32 = 0.000001;
    /// Auto rotation applied per update at speed 1.
    pub const AUTO_ROTATE_TICK: f32 = 2.0 * PI / 60.0 / 60.0;

    pub fn new(config: &CameraConfig) -> Self {
        Self {
            auto_rotate: config.auto_rotate,
            auto_rotate_speed: config.auto_rotate_speed,
            ..Self::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether input is waiting for the next [`update`](Self::update).
    pub fn has_pending_input(&self) -> bool {
        self.pending
    }

    /// Rotates around the target by `angle` to the left.
    pub fn rotate_left(&mut self, angle: Rad<f32>) {
        self.delta_theta -= angle.0;
        self.pending = true;
    }

    pub fn rotate_up(&mut self, angle: Rad<f32>) {
        self.delta_phi -= angle.0;
        self.pending = true;
    }

    /// Moves the camera towards the target (`scale < 1`) or away from it.
    pub fn dolly(&mut self, scale: f32) {
        if scale > 0.0 {
            self.scale *= scale;
            self.pending = true;
        }
    }

    /// Pans by a cursor movement in pixels.
    pub fn pan_pixels(&mut self, dx: f32, dy: f32) {
        self.pending_pan += Vector2::new(dx, dy);
        self.pending = true;
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let drag = match button {
                    MouseButton::Left => Some(Drag::Rotate),
                    MouseButton::Right | MouseButton::Middle => Some(Drag::Pan),
                    _ => None,
                };
                match state {
                    ElementState::Pressed if drag.is_some() => self.drag = drag,
                    ElementState::Released if drag == self.drag => self.drag = None,
                    _ => (),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (Some(drag), Some(last)) = (self.drag, self.last_cursor) {
                    let dx = (position.x - last.x) as f32;
                    let dy = (position.y - last.y) as f32;
                    match drag {
                        Drag::Rotate => {
                            self.pending_rotate += Vector2::new(dx, dy);
                            self.pending = true;
                        }
                        Drag::Pan => self.pan_pixels(dx, dy),
                    }
                }
                self.last_cursor = Some(*position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
                self.drag = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                // Scrolling up moves the camera closer
                if scroll > 0.0 {
                    self.dolly(self.zoom_scale());
                } else if scroll < 0.0 {
                    self.dolly(1.0 / self.zoom_scale());
                }
            }
            _ => (),
        }
    }

    /// Applies accumulated input plus one auto rotation tick, then re-aims the
    /// camera. Returns `false` and leaves the camera alone when no input is pending.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, viewport_height: f32) -> bool {
        if !self.pending {
            return false;
        }
        let height = viewport_height.max(1.0);
        if self.pending_rotate != Vector2::new(0.0, 0.0) {
            let rotate = self.pending_rotate;
            self.rotate_left(Rad(2.0 * PI * rotate.x / height * self.rotate_speed));
            self.rotate_up(Rad(2.0 * PI * rotate.y / height * self.rotate_speed));
            self.pending_rotate = Vector2::new(0.0, 0.0);
        }
        if self.auto_rotate && self.drag.is_none() {
            self.rotate_left(Rad(Self::AUTO_ROTATE_TICK * self.auto_rotate_speed));
        }

        let offset = camera.position - self.target;
        let radius = offset.magnitude();
        let (mut theta, mut phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, 0.0)
        };

        if self.pending_pan != Vector2::new(0.0, 0.0) {
            let target_distance = radius * (Rad::from(camera.fov).0 / 2.0).tan();
            let view = camera.view_matrix();
            // Rows of the view rotation are the camera's right and up axes
            let right = Vector3::new(view.x.x, view.y.x, view.z.x);
            let up = Vector3::new(view.x.y, view.y.y, view.z.y);
            let pan_x = 2.0 * self.pending_pan.x * target_distance / height * self.pan_speed;
            let pan_y = 2.0 * self.pending_pan.y * target_distance / height * self.pan_speed;
            self.target += right * -pan_x + up * pan_y;
            self.pending_pan = Vector2::new(0.0, 0.0);
        }

        theta += self.delta_theta;
        phi += self.delta_phi;
        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(Self::EPS, PI - Self::EPS);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.target = self.target;

        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pending = false;
        true
    }
}
