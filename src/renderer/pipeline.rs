use wgpu::{BindGroupLayout, Device, RenderPipeline, TextureFormat};

use super::gpu::{LineInstance, QuadVertex};

const SHADER_SOURCE: &str = r#"
struct Uniforms {
    screen_size: vec2<f32>,  // physical pixels
    scale_factor: f32,
    _pad: f32,
}

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec2<f32>,   // unit quad corner
    @location(1) endpoints: vec4<f32>,  // x0, y0, x1, y1 in logical pixels
    @location(2) color: vec4<f32>,
    @location(3) half_width: f32,       // logical pixels
    @location(4) cap: u32,              // 0 = butt, 1 = round, 2 = square
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) local: vec2<f32>,  // x along the segment, y across it (physical pixels)
    @location(2) @interpolate(flat) params: vec2<f32>,  // x = length, y = half width
    @location(3) @interpolate(flat) cap: u32,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;

    let s = uniforms.scale_factor;
    let p0 = in.endpoints.xy * s;
    let p1 = in.endpoints.zw * s;
    let hw = in.half_width * s;

    let d = p1 - p0;
    let len = length(d);
    var dir = vec2<f32>(1.0, 0.0);
    if (len > 0.0001) {
        dir = d / len;
    }
    let normal = vec2<f32>(-dir.y, dir.x);

    // Cover the caps plus one pixel for anti-aliasing
    let margin = hw + 1.0;
    let lx = mix(-margin, len + margin, in.position.x);
    let ly = mix(-margin, margin, in.position.y);
    let world = p0 + dir * lx + normal * ly;

    let ndc = vec2<f32>(
        world.x / uniforms.screen_size.x * 2.0 - 1.0,
        1.0 - world.y / uniforms.screen_size.y * 2.0
    );
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.color = in.color;
    out.local = vec2<f32>(lx, ly);
    out.params = vec2<f32>(len, hw);
    out.cap = in.cap;
    return out;
}

// Signed distance to a box centered at `center` with half extents `half_size`
fn sd_box(p: vec2<f32>, center: vec2<f32>, half_size: vec2<f32>) -> f32 {
    let q = abs(p - center) - half_size;
    return length(max(q, vec2<f32>(0.0, 0.0))) + min(max(q.x, q.y), 0.0);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let len = in.params.x;
    let hw = in.params.y;

    var dist: f32;
    if (in.cap == 1u) {
        // Capsule: distance to the closest point on the segment
        let t = clamp(in.local.x, 0.0, len);
        dist = length(in.local - vec2<f32>(t, 0.0)) - hw;
    } else {
        var extension = 0.0;
        if (in.cap == 2u) {
            extension = hw;
        }
        dist = sd_box(
            in.local,
            vec2<f32>(len * 0.5, 0.0),
            vec2<f32>(len * 0.5 + extension, hw)
        );
    }

    let alpha = 1.0 - smoothstep(-0.5, 0.5, dist);
    if (alpha <= 0.0) {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * alpha);
}
"#;

pub fn create_line_pipeline(
    device: &Device,
    bind_group_layout: &BindGroupLayout,
    format: TextureFormat,
) -> RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Line Shader"),
        source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Line Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Line Render Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[QuadVertex::desc(), LineInstance::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
