use wgpu::util::DeviceExt;

use crate::config::GrainParams;

/// Base colour of every mesh before lighting and grain.
pub const DIFFUSE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GrainUniform {
    diffuse: [f32; 4],
    noise_coef: f32,
    noise_min: f32,
    noise_max: f32,
    noise_scale: f32,
}

impl GrainUniform {
    pub fn new(params: &GrainParams) -> Self {
        Self {
            diffuse: DIFFUSE,
            noise_coef: params.noise_coef,
            noise_min: params.noise_min,
            noise_max: params.noise_max,
            noise_scale: params.noise_scale,
        }
    }

    pub fn noise(&self) -> [f32; 4] {
        [self.noise_coef, self.noise_min, self.noise_max, self.noise_scale]
    }
}

/// The shared grain material: one uniform buffer read by every mesh.
pub struct GrainResources {
    pub uniform: GrainUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl GrainResources {
    pub fn new(device: &wgpu::Device, params: &GrainParams) -> Self {
        let uniform = GrainUniform::new(params);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grain Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("grain_bind_group_layout"),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("grain_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Copies the four noise values into the uniform and uploads it.
    pub fn apply(&mut self, queue: &wgpu::Queue, params: &GrainParams) {
        self.uniform = GrainUniform::new(params);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
