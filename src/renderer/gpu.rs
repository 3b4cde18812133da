//! GPU data structures for instanced line rendering.
//!
//! Every stroked segment is one instance of a shared unit quad. The vertex
//! shader stretches the quad over the segment's bounding box (including
//! caps and an anti-aliasing margin); the fragment shader cuts the exact
//! shape out with a distance field.

use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use super::commands::DrawCommand;
use crate::canvas::StrokeCap;

/// Screen-wide values needed to map pixels to clip space.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderUniforms {
    /// Surface size in physical pixels (width, height)
    pub screen_size: [f32; 2],
    /// HiDPI scale factor applied to logical coordinates
    pub scale_factor: f32,
    /// Padding for 16-byte alignment
    pub _pad: f32,
}

impl ShaderUniforms {
    pub fn new(screen_width: f32, screen_height: f32, scale_factor: f32) -> Self {
        Self {
            screen_size: [screen_width, screen_height],
            scale_factor,
            _pad: 0.0,
        }
    }
}

/// A corner of the unit quad shared by every instance.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Position in 0..1 range
    pub position: [f32; 2],
}

impl QuadVertex {
    pub fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: &[VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: VertexFormat::Float32x2,
            }],
        }
    }
}

pub const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex {
        position: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 0.0],
    },
    QuadVertex {
        position: [0.0, 1.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
    },
];

pub const QUAD_INDICES: &[u16] = &[0, 1, 2, 1, 3, 2];

/// Cap codes understood by the shader.
pub const CAP_BUTT: u32 = 0;
pub const CAP_ROUND: u32 = 1;
pub const CAP_SQUARE: u32 = 2;

/// Per-instance data for one stroked segment, in logical pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineInstance {
    /// Segment endpoints: [x0, y0, x1, y1]
    pub endpoints: [f32; 4],
    /// Stroke color RGBA
    pub color: [f32; 4],
    /// Half of the stroke width
    pub half_width: f32,
    /// One of the `CAP_*` codes
    pub cap: u32,
    /// Padding for 16-byte alignment
    pub _pad: [f32; 2],
}

impl LineInstance {
    /// Instance for a line command. `None` for anything that is not a line.
    pub fn from_command(command: &DrawCommand) -> Option<Self> {
        match command {
            DrawCommand::Line {
                from,
                to,
                width,
                color,
                cap,
            } => Some(Self {
                endpoints: [from.0, from.1, to.0, to.1],
                color: color.to_array(),
                half_width: width * 0.5,
                cap: match cap {
                    StrokeCap::Butt => CAP_BUTT,
                    StrokeCap::Round => CAP_ROUND,
                    StrokeCap::Square => CAP_SQUARE,
                },
                _pad: [0.0, 0.0],
            }),
            DrawCommand::Clear { .. } => None,
        }
    }

    pub fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as u64,
            step_mode: VertexStepMode::Instance,
            attributes: &[
                // endpoints
                VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: VertexFormat::Float32x4,
                },
                // color
                VertexAttribute {
                    offset: 16,
                    shader_location: 2,
                    format: VertexFormat::Float32x4,
                },
                // half_width
                VertexAttribute {
                    offset: 32,
                    shader_location: 3,
                    format: VertexFormat::Float32,
                },
                // cap
                VertexAttribute {
                    offset: 36,
                    shader_location: 4,
                    format: VertexFormat::Uint32,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Color;

    #[test]
    fn test_instance_layout_is_aligned() {
        assert_eq!(std::mem::size_of::<LineInstance>(), 48);
        assert_eq!(std::mem::size_of::<ShaderUniforms>(), 16);
    }

    #[test]
    fn test_instance_from_line_command() {
        let command = DrawCommand::Line {
            from: (1.0, 2.0),
            to: (3.0, 4.0),
            width: 6.0,
            color: Color::WHITE,
            cap: StrokeCap::Round,
        };
        let instance = LineInstance::from_command(&command).unwrap();
        assert_eq!(instance.endpoints, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(instance.half_width, 3.0);
        assert_eq!(instance.cap, CAP_ROUND);
        assert_eq!(instance.color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_clear_has_no_instance() {
        let command = DrawCommand::Clear {
            color: Color::BLACK,
        };
        assert!(LineInstance::from_command(&command).is_none());
    }
}
