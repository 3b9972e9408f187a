use crate::core::Color;
use crate::pipeline::buffer::Buffer;
use glam::{IVec2, Vec2, Vec3};

/// Distance from the eye to the projection plane, in pixels.
pub const FOV: f32 = 400.0;

pub const MIN_LINE_WIDTH: f32 = 1.0;
pub const MAX_LINE_WIDTH: f32 = 4.0;

pub const MIN_GLOW_RADIUS: f32 = 2.0;
pub const MAX_GLOW_RADIUS: f32 = 20.0;

/// Every `SCANLINE_PERIOD`th row is blacked out by the scanline pass.
pub const SCANLINE_PERIOD: usize = 3;

/// A vertex after perspective projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub pos: Vec2,
    /// `z + fov`, distance from the eye
    pub depth: f32,
    /// `fov / depth`; bigger is nearer
    pub scale: f32,
}

impl ProjectedPoint {
    /// Pixel the point falls in.
    pub fn pixel(&self) -> IVec2 {
        self.pos.floor().as_ivec2()
    }
}

/// Perspective-project `vertex` around the screen point `center`.
///
/// Returns `None` for points at or behind the eye; anything connected to
/// them is simply not drawn.
pub fn project(vertex: Vec3, center: Vec2, fov: f32) -> Option<ProjectedPoint> {
    let depth = vertex.z + fov;
    if depth <= 0.0 {
        return None;
    }
    let scale = fov / depth;
    Some(ProjectedPoint {
        pos: Vec2::new(center.x + vertex.x * scale, center.y - vertex.y * scale),
        depth,
        scale,
    })
}

/// Nearer lines are drawn thicker.
pub fn line_width(p1: &ProjectedPoint, p2: &ProjectedPoint) -> f32 {
    ((p1.scale + p2.scale) * 0.4).clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
}

pub fn glow_radius(p: &ProjectedPoint) -> f32 {
    (3.0 * p.scale).clamp(MIN_GLOW_RADIUS, MAX_GLOW_RADIUS)
}

/// Line from `p1` to `p2` with the color blended from `c1` to `c2` along its length.
///
/// The first pixel is exactly `c1` and the last exactly `c2`.
pub fn draw_wireframe_line<B: Buffer>(
    buffer: &mut B,
    p1: &ProjectedPoint,
    p2: &ProjectedPoint,
    c1: Color,
    c2: Color,
) {
    let width = line_width(p1, p2).round() as i32;
    // square brush, centered as well as an integer width allows
    let lo = -(width - 1) / 2;
    let hi = lo + width - 1;

    let start = p1.pixel();
    let end = p2.pixel();
    let steps = (end.x - start.x).abs().max((end.y - start.y).abs()).max(1);

    bresenham(start, end, |pos, step| {
        let color = c1.lerp(&c2, step as f32 / steps as f32);
        for oy in lo..=hi {
            for ox in lo..=hi {
                buffer.set_pixel(pos.x + ox, pos.y + oy, color);
            }
        }
    });
    // later brush stamps overlap the start pixel on thick lines
    buffer.set_pixel(start.x, start.y, c1);
}

/// Soft round highlight centered on `p`, fully `color` in the middle and
/// fading linearly to nothing at the rim.
pub fn draw_glow<B: Buffer>(buffer: &mut B, p: &ProjectedPoint, color: Color) {
    let radius = glow_radius(p);
    let reach = radius.ceil() as i32;
    let center = p.pixel();

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d = ((dx * dx + dy * dy) as f32).sqrt();
            if d >= radius {
                continue;
            }
            let alpha = 1.0 - d / radius;
            buffer.blend_pixel(center.x + dx, center.y + dy, color, alpha);
        }
    }
}

/// CRT-style dark rows every `period` pixels, starting at row 0.
pub fn draw_scanlines<B: Buffer>(buffer: &mut B, period: usize) {
    let period = period.max(1);
    let (width, height) = (buffer.width() as i32, buffer.height());
    for y in (0..height).step_by(period) {
        for x in 0..width {
            buffer.set_pixel(x, y as i32, Color::BLACK);
        }
    }
}

/// All-octant Bresenham. `plot` gets each pixel and its step index from 0.
pub fn bresenham<F>(start: IVec2, end: IVec2, mut plot: F)
where
    F: FnMut(IVec2, usize),
{
    let (mut x0, mut y0) = (start.x, start.y);
    let (x1, y1) = (end.x, end.y);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut step = 0;

    loop {
        plot(IVec2::new(x0, y0), step);

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
        step += 1;
    }
}
