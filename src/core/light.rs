use crate::core::math::normalize;
use crate::core::Color;
use glam::Vec3;

pub const AMBIENT: f32 = 0.3;
pub const DIFFUSE: f32 = 0.7;

/// Warm shift applied on top of the body shading so wings read as a different material.
pub const WING_TINT: (u8, u8, u8) = (100, 50, 0);

/// A light that only has a direction. Intensity is fixed by `AMBIENT` / `DIFFUSE`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector pointing towards the light.
    pub direction: Vec3,
}

impl DirectionalLight {
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: normalize(direction),
        }
    }

    /// Color of a body vertex. `vertex` is already in world space.
    pub fn shade_body(&self, vertex: Vec3) -> Color {
        compute_vertex_color(vertex, body_normal(vertex), self.direction)
    }

    /// Color of a wing vertex, same ramp as the body but tinted warmer.
    pub fn shade_wing(&self, vertex: Vec3) -> Color {
        let (r, g, b) = WING_TINT;
        compute_vertex_color(vertex, Vec3::Y, self.direction).saturating_add(r, g, b)
    }
}

impl Default for DirectionalLight {
    /// Up and slightly to the right and front: normalized (1, 2, 1).
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.408, 0.816, 0.408),
        }
    }
}

/// Stand-in for a surface normal: the vertex position squashed in x and z.
/// There is no face data, so this is what the body is lit with.
pub fn body_normal(vertex: Vec3) -> Vec3 {
    normalize(Vec3::new(vertex.x * 0.3, vertex.y, vertex.z * 0.5))
}

/// Ambient + Lambert diffuse over a cyan to magenta height ramp.
///
/// Intensity is not capped at 1.0; the final channels are clamped to
/// [0, 255] and truncated.
pub fn compute_vertex_color(vertex: Vec3, normal: Vec3, light_dir: Vec3) -> Color {
    let base = Color::TOASTER_CYAN;
    let highlight = Color::TOASTER_MAGENTA;

    let ndotl = normal.dot(light_dir).max(0.0);
    let intensity = AMBIENT + DIFFUSE * ndotl;

    let blend = ((vertex.y + 1.0) / 2.0).clamp(0.0, 1.0);
    let channel =
        |b: u8, h: u8| (b as f32 * (1.0 - blend) + h as f32 * blend) * intensity;

    Color::from_f32_clamped(
        channel(base.r, highlight.r),
        channel(base.g, highlight.g),
        channel(base.b, highlight.b),
    )
}
