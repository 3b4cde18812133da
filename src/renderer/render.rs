//! GPU presentation of recorded draw commands.
//!
//! Lines are uploaded as instances and drawn with one call per frame. The
//! last [`DrawCommand::Clear`] in a frame becomes the pass clear color.

use std::sync::Arc;

use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, BufferUsages, Device, Queue, RenderPipeline};

use super::commands::DrawCommand;
use super::gpu::{LineInstance, ShaderUniforms, QUAD_INDICES, QUAD_VERTICES};
use super::gpu_context::SurfaceState;
use super::pipeline::create_line_pipeline;
use crate::canvas::Color;

const INITIAL_INSTANCE_CAPACITY: usize = 64;

pub struct Renderer {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline: RenderPipeline,

    // Shared unit quad
    vertex_buffer: Buffer,
    index_buffer: Buffer,

    uniform_buffer: Buffer,
    uniform_bind_group: BindGroup,

    // Grows on demand, never shrinks
    instance_buffer: Buffer,
    instance_buffer_capacity: usize,

    // Physical pixels
    screen_width: f32,
    screen_height: f32,
    scale_factor: f32,
    background: Color,
}

impl Renderer {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>, format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Line Bind Group Layout"),
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
        });

        let pipeline = create_line_pipeline(&device, &bind_group_layout, format);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Vertex Buffer"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Index Buffer"),
            contents: bytemuck::cast_slice(QUAD_INDICES),
            usage: BufferUsages::INDEX,
        });

        let uniforms = ShaderUniforms::new(1.0, 1.0, 1.0);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Line Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let instance_buffer = create_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);

        Self {
            device,
            queue,
            pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            uniform_bind_group,
            instance_buffer,
            instance_buffer_capacity: INITIAL_INSTANCE_CAPACITY,
            screen_width: 1.0,
            screen_height: 1.0,
            scale_factor: 1.0,
            background: Color::BLACK,
        }
    }

    /// Set the screen size in physical pixels.
    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;
    }

    pub fn set_scale_factor(&mut self, scale: f32) {
        self.scale_factor = scale;
    }

    /// Clear color used when a frame records no clear of its own.
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    fn ensure_instance_capacity(&mut self, count: usize) {
        if count > self.instance_buffer_capacity {
            let new_capacity = (self.instance_buffer_capacity * 2).max(count);
            log::debug!("growing line instance buffer to {new_capacity}");
            self.instance_buffer = create_instance_buffer(&self.device, new_capacity);
            self.instance_buffer_capacity = new_capacity;
        }
    }

    /// Draw one frame of commands to the surface and present it.
    pub fn render(&mut self, surface: &mut SurfaceState, commands: &[DrawCommand]) {
        let output = match surface.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) => {
                surface.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms =
            ShaderUniforms::new(self.screen_width, self.screen_height, self.scale_factor);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let frame = prepare_frame(commands, self.background);
        self.ensure_instance_capacity(frame.instances.len());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Line Encoder"),
            });

        {
            let clear = frame.clear_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Line Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !frame.instances.is_empty() {
                self.queue.write_buffer(
                    &self.instance_buffer,
                    0,
                    bytemuck::cast_slice(&frame.instances),
                );
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(
                    0..QUAD_INDICES.len() as u32,
                    0,
                    0..frame.instances.len() as u32,
                );
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

fn create_instance_buffer(device: &Device, capacity: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Line Instance Buffer"),
        size: (capacity * std::mem::size_of::<LineInstance>()) as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Instance data and clear color for one frame.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PreparedFrame {
    pub clear_color: Color,
    pub instances: Vec<LineInstance>,
}

/// Split commands into the pass clear color and line instances.
///
/// A clear wipes every line recorded before it, so only lines after the
/// last clear are kept.
pub(crate) fn prepare_frame(commands: &[DrawCommand], background: Color) -> PreparedFrame {
    let last_clear = commands
        .iter()
        .rposition(|cmd| matches!(cmd, DrawCommand::Clear { .. }));

    let (clear_color, rest) = match last_clear {
        Some(index) => match &commands[index] {
            DrawCommand::Clear { color } => (*color, &commands[index + 1..]),
            DrawCommand::Line { .. } => (background, commands),
        },
        None => (background, commands),
    };

    PreparedFrame {
        clear_color,
        instances: rest.iter().filter_map(LineInstance::from_command).collect(),
    }
}
