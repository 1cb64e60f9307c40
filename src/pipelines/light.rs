use cgmath::{InnerSpace, Point3, Rad, Vector3};
use wgpu::util::DeviceExt;

use crate::config::LightConfig;

/// Number of spot lights the grain shader evaluates.
pub const MAX_LIGHTS: usize = 2;

/// A cone light aimed at `target`. Distance falloff is disabled.
#[derive(Clone, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vector3<f32>,
    pub target: Point3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Half angle of the cone.
    pub angle: Rad<f32>,
    /// Fraction of the cone that fades out, 0 gives a hard edge.
    pub penumbra: f32,
}

impl SpotLight {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            position: config.position,
            target: Point3::new(0.0, 0.0, 0.0),
            color: config.color,
            intensity: config.intensity,
            angle: Rad::from(config.angle),
            penumbra: config.penumbra.clamp(0.0, 1.0),
        }
    }

    pub fn direction(&self) -> Vector3<f32> {
        let direction = self.target - Point3::new(self.position.x, self.position.y, self.position.z);
        if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            -Vector3::unit_y()
        }
    }

    pub fn to_raw(&self) -> SpotLightRaw {
        let outer = self.angle.0.cos();
        let inner = (self.angle.0 * (1.0 - self.penumbra)).cos();
        SpotLightRaw {
            position: self.position.into(),
            intensity: self.intensity,
            direction: self.direction().into(),
            cos_angle: outer,
            color: self.color,
            penumbra_cos: inner,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightRaw {
    position: [f32; 3],
    intensity: f32,
    direction: [f32; 3],
    cos_angle: f32,
    color: [f32; 3],
    penumbra_cos: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    lights: [SpotLightRaw; MAX_LIGHTS],
    // rgb ambient term, w is the number of active lights
    ambient: [f32; 4],
}

pub struct LightResources {
    pub lights: Vec<SpotLight>,
    pub uniform: LightsUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, config: &LightConfig) -> Self {
        let count = config.count.min(MAX_LIGHTS);
        if count < config.count {
            log::warn!(
                "{} spot lights requested, only {MAX_LIGHTS} are supported",
                config.count
            );
        }
        let lights: Vec<SpotLight> = (0..count).map(|_| SpotLight::from_config(config)).collect();
        let uniform = mk_uniform(&lights);
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            lights,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue) {
        self.uniform = mk_uniform(&self.lights);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

/// Moves light `index` along X. Unknown indices are ignored.
pub fn set_light_x(lights: &mut [SpotLight], index: usize, x: f32) {
    if let Some(light) = lights.get_mut(index) {
        light.position.x = x;
    }
}

pub fn mk_uniform(lights: &[SpotLight]) -> LightsUniform {
    let mut raw: [SpotLightRaw; MAX_LIGHTS] = bytemuck::Zeroable::zeroed();
    for (slot, light) in raw.iter_mut().zip(lights) {
        *slot = light.to_raw();
    }
    LightsUniform {
        lights: raw,
        ambient: [0.1, 0.1, 0.1, lights.len().min(MAX_LIGHTS) as f32],
    }
}

pub fn mk_buffer(device: &wgpu::Device, uniform: LightsUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Lights Buffer"),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("lights_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("lights_bind_group"),
    })
}
