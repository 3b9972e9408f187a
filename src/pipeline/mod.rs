use crate::core::Color;

pub mod buffer;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod rasterizer;

pub use buffer::{Buffer, FrameBuffer, TermBuffer};
pub use pipeline::{render_toaster, Pipeline};
pub use rasterizer::{
    draw_glow, draw_scanlines, draw_wireframe_line, project, ProjectedPoint, FOV, SCANLINE_PERIOD,
};

/// What the screen is cleared to.
pub const BACKGROUND: Color = Color::NIGHT;

/// How strongly the background is laid over the previous frame when trails are on.
pub const TRAIL_ALPHA: f32 = 0.25;

/// Number of body vertices that get a corner glow (the front face).
pub const GLOW_VERTICES: usize = 4;

/// Per-frame toggles handed in by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_scanlines: bool,
    pub show_glow: bool,
    pub show_trails: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_scanlines: true,
            show_glow: true,
            show_trails: true,
        }
    }
}
