use euclid::{
    default::{Point2D, Rect, Size2D},
    point2, size2,
};
use zerocopy::AsBytes;

use crate::{gl, texture_atlas::TextureRect};

pub const TRANSFORM_UNIFORM: usize = 0;
pub const TEXTURE_UNIFORM: usize = 1;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, AsBytes)]
pub struct Vertex {
    position: [f32; 2],
    uv: [f32; 2],
}

/// Builds the program every backend draws with: textured triangles in screen
/// pixel coordinates, origin at the top left. The texture uniform is left for
/// the caller to set.
pub fn create_sprite_program(
    context: &mut gl::Context,
    screen_size: (u32, u32),
) -> Result<gl::Program, gl::GLError> {
    let vertex_shader = unsafe {
        context.create_shader(gl::ShaderType::Vertex, include_str!("shaders/sprite.vert"))?
    };
    let fragment_shader = unsafe {
        context.create_shader(
            gl::ShaderType::Fragment,
            include_str!("shaders/sprite.frag"),
        )?
    };

    let mut program = unsafe {
        context.create_program(&gl::ProgramDescriptor {
            vertex_shader: &vertex_shader,
            fragment_shader: &fragment_shader,
            uniforms: &[
                gl::UniformEntry {
                    name: "u_transform",
                    ty: gl::UniformType::Mat3,
                },
                gl::UniformEntry {
                    name: "u_texture",
                    ty: gl::UniformType::Texture,
                },
            ],
            vertex_format: gl::VertexFormat {
                stride: std::mem::size_of::<Vertex>(),
                attributes: &[
                    gl::VertexAttribute {
                        name: "a_pos",
                        size: 2,
                        offset: 0,
                    },
                    gl::VertexAttribute {
                        name: "a_uv",
                        size: 2,
                        offset: 2 * 4,
                    },
                ],
            },
        })?
    };

    program.set_uniform(
        TRANSFORM_UNIFORM,
        gl::Uniform::Mat3(screen_transform(screen_size)),
    )?;

    Ok(program)
}

/// Column major matrix taking pixel coordinates (y down) to clip space.
pub fn screen_transform(screen_size: (u32, u32)) -> [[f32; 3]; 3] {
    let (width, height) = (screen_size.0 as f32, screen_size.1 as f32);
    [
        [2. / width, 0., 0.],
        [0., -2. / height, 0.],
        [-1., 1., 1.],
    ]
}

/// Texture coordinates of an atlas region, normalized to the atlas size.
pub fn atlas_uv(rect: TextureRect, atlas_size: Size2D<u32>) -> Rect<f32> {
    let uv_pos = point2(
        rect[0] as f32 / atlas_size.width as f32,
        rect[1] as f32 / atlas_size.height as f32,
    );
    let uv_size = size2(
        (rect[2] - rect[0]) as f32 / atlas_size.width as f32,
        (rect[3] - rect[1]) as f32 / atlas_size.height as f32,
    );
    Rect::new(uv_pos, uv_size)
}

/// The whole of a texture.
pub fn full_uv() -> Rect<f32> {
    Rect::new(point2(0., 0.), size2(1., 1.))
}

/// Appends the two triangles of an axis aligned quad. Texture row 0 maps to
/// the top edge of the quad.
pub fn render_quad(
    position: Point2D<f32>,
    size: Size2D<f32>,
    uv_rect: Rect<f32>,
    out: &mut Vec<Vertex>,
) {
    let vertex_rect = Rect::new(position, size);

    let top_left = Vertex {
        position: vertex_rect.min().to_array(),
        uv: [uv_rect.min_x(), uv_rect.min_y()],
    };
    let top_right = Vertex {
        position: [vertex_rect.max_x(), vertex_rect.min_y()],
        uv: [uv_rect.max_x(), uv_rect.min_y()],
    };
    let bottom_left = Vertex {
        position: [vertex_rect.min_x(), vertex_rect.max_y()],
        uv: [uv_rect.min_x(), uv_rect.max_y()],
    };
    let bottom_right = Vertex {
        position: vertex_rect.max().to_array(),
        uv: [uv_rect.max_x(), uv_rect.max_y()],
    };

    out.extend_from_slice(&[
        top_left,
        top_right,
        bottom_left,
        top_right,
        bottom_right,
        bottom_left,
    ]);
}

pub const TEXTURE_ATLAS_SIZE: Size2D<u32> = Size2D {
    width: 1024,
    height: 1024,
    _unit: std::marker::PhantomData::<euclid::UnknownUnit>,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(m: [[f32; 3]; 3], p: [f32; 2]) -> [f32; 2] {
        [
            m[0][0] * p[0] + m[1][0] * p[1] + m[2][0],
            m[0][1] * p[0] + m[1][1] * p[1] + m[2][1],
        ]
    }

    #[test]
    fn screen_corners_map_to_clip_corners() {
        let m = screen_transform((800, 600));
        assert_eq!(apply(m, [0., 0.]), [-1., 1.]);
        assert_eq!(apply(m, [800., 600.]), [1., -1.]);
        assert_eq!(apply(m, [400., 300.]), [0., 0.]);
    }

    #[test]
    fn quad_covers_its_rect() {
        let mut out = Vec::new();
        render_quad(point2(10., 20.), size2(33., 24.), full_uv(), &mut out);

        assert_eq!(out.len(), 6);
        for v in &out {
            assert!(v.position[0] == 10. || v.position[0] == 43.);
            assert!(v.position[1] == 20. || v.position[1] == 44.);
            // uv follows position: left/top edges sample 0, right/bottom sample 1
            assert_eq!(v.uv[0], if v.position[0] == 10. { 0. } else { 1. });
            assert_eq!(v.uv[1], if v.position[1] == 20. { 0. } else { 1. });
        }
    }

    #[test]
    fn atlas_uv_is_normalized() {
        let uv = atlas_uv([256, 512, 512, 1024], TEXTURE_ATLAS_SIZE);
        assert_eq!(uv, Rect::new(point2(0.25, 0.5), size2(0.25, 0.5)));
    }
}
