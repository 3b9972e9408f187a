use std::cell::{Ref, RefCell};
use std::time::Instant;

use glam::{Vec2, Vec3};
use log::trace;
use minifb::Window;

use crate::{
    core::{Color, DirectionalLight, Edge, FlyingToaster, Scene, WingSide},
    error::Result,
    Metrics,
};

use super::{
    buffer::Buffer,
    rasterizer::{draw_glow, draw_scanlines, draw_wireframe_line, project, ProjectedPoint},
    RenderOptions, BACKGROUND, FOV, GLOW_VERTICES, SCANLINE_PERIOD, TRAIL_ALPHA,
};

/// Owns the scene and a pair of surfaces, and turns one into a picture per call.
///
/// Each frame:
/// 1. Clear the back buffer (or fade the last frame into it for trails)
/// 2. Advance every toaster
/// 3. Take a depth-sorted snapshot
/// 4. Draw each toaster back to front: body, corner glow, both wings
/// 5. Scanlines
/// 6. Present the back buffer and swap
pub struct Pipeline<B: Buffer> {
    pub width: usize,  // Screen width in pixels
    pub height: usize, // Screen height in pixels
    front_buffer: RefCell<B>, // Last presented frame
    back_buffer: RefCell<B>,  // Frame being drawn
    pub scene: Scene,
    metrics: Metrics,
    last_frame: Instant,
}

impl<B: Buffer> Pipeline<B> {
    pub fn new(width: usize, height: usize, scene: Scene) -> Self {
        Self {
            width,
            height,
            front_buffer: RefCell::new(B::new(width, height)),
            back_buffer: RefCell::new(B::new(width, height)),
            scene,
            metrics: Metrics::new(),
            last_frame: Instant::now(),
        }
    }

    /// Runs one full update + render + present cycle.
    ///
    /// With a window the frame is blitted to it, otherwise `Buffer::present` is used.
    pub fn render_frame(&mut self, options: &RenderOptions, window: Option<&mut Window>) -> Result<()> {
        {
            let mut back = self.back_buffer.borrow_mut();
            if options.show_trails {
                back.copy_from(&self.front_buffer.borrow());
                back.fade(BACKGROUND, TRAIL_ALPHA);
            } else {
                back.clear(BACKGROUND);
            }
        }

        self.scene.update();

        let sorted = self.scene.depth_sorted();
        let mut edges = 0;
        {
            let mut back = self.back_buffer.borrow_mut();
            for toaster in &sorted {
                edges += render_toaster(&mut *back, toaster, &self.scene.light, options.show_glow);
            }
            if options.show_scanlines {
                draw_scanlines(&mut *back, SCANLINE_PERIOD);
            }
        }
        trace!("Drew {} toasters, {} edges", sorted.len(), edges);

        if let Some(window) = window {
            self.back_buffer.borrow().present_window(window)?;
        } else {
            self.back_buffer.borrow().present()?;
        }
        self.swap_buffers();

        let now = Instant::now();
        self.metrics.update(now - self.last_frame);
        self.last_frame = now;
        Ok(())
    }

    /// New viewport: reallocates both surfaces and moves the scene's spawn bounds.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.front_buffer.borrow_mut().resize(width, height);
        self.back_buffer.borrow_mut().resize(width, height);
        self.scene.resize(width, height);
    }

    pub fn swap_buffers(&self) {
        std::mem::swap(
            &mut *self.front_buffer.borrow_mut(),
            &mut *self.back_buffer.borrow_mut(),
        );
    }

    /// The most recently finished frame.
    pub fn front_buffer(&self) -> Ref<'_, B> {
        self.front_buffer.borrow()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Draws one toaster completely. Returns how many edges made it to the screen.
pub fn render_toaster<B: Buffer>(
    buffer: &mut B,
    toaster: &FlyingToaster,
    light: &DirectionalLight,
    show_glow: bool,
) -> usize {
    let center = Vec2::new(toaster.x, toaster.y);

    let body = &toaster.body;
    let (points, colors) = shade_and_project(
        body.vertices.iter().map(|&v| toaster.to_world(v)),
        center,
        |v| light.shade_body(v),
    );
    let mut drawn = draw_edges(buffer, &body.edges, &points, &colors);

    if show_glow {
        for (point, &color) in points.iter().zip(&colors).take(GLOW_VERTICES) {
            if let Some(p) = point {
                draw_glow(buffer, p, color);
            }
        }
    }

    for side in [WingSide::Left, WingSide::Right] {
        let wing = toaster.wing(side);
        let (points, colors) = shade_and_project(
            wing.vertices.iter().map(|&v| toaster.wing_to_world(side, v)),
            center,
            |v| light.shade_wing(v),
        );
        drawn += draw_edges(buffer, &wing.edges, &points, &colors);
    }

    drawn
}

/// Per-vertex scratch for one model: projected point (if visible) and color.
fn shade_and_project<I, F>(
    world: I,
    center: Vec2,
    shade: F,
) -> (Vec<Option<ProjectedPoint>>, Vec<Color>)
where
    I: ExactSizeIterator<Item = Vec3>,
    F: Fn(Vec3) -> Color,
{
    let mut points = Vec::with_capacity(world.len());
    let mut colors = Vec::with_capacity(world.len());
    for v in world {
        colors.push(shade(v));
        points.push(project(v, center, FOV));
    }
    (points, colors)
}

fn draw_edges<B: Buffer>(
    buffer: &mut B,
    edges: &[Edge],
    points: &[Option<ProjectedPoint>],
    colors: &[Color],
) -> usize {
    let mut drawn = 0;
    for &Edge(a, b) in edges {
        if let (Some(Some(p1)), Some(Some(p2))) = (points.get(a), points.get(b)) {
            draw_wireframe_line(buffer, p1, p2, colors[a], colors[b]);
            drawn += 1;
        }
    }
    drawn
}
