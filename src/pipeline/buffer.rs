use crate::core::Color;
use crate::error::{Result, ToasterError};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use image::{Rgb, RgbImage};
use minifb::Window;
use rayon::prelude::*;
use std::io::{stdout, Write};

const PAR_CHUNK: usize = 1024;

/// A 2D color surface the rasterizer draws into.
///
/// Coordinates are signed so callers can hand over points that fall off
/// the edge; those writes are dropped.
pub trait Buffer {
    fn new(width: usize, height: usize) -> Self
    where
        Self: Sized;
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn resize(&mut self, width: usize, height: usize);
    /// Fill every pixel with `color`.
    fn clear(&mut self, color: Color);
    /// Lay `color` over the whole surface at `alpha` opacity.
    fn fade(&mut self, color: Color, alpha: f32);
    /// Overwrite with another surface of the same size; clears to black on a size mismatch.
    fn copy_from(&mut self, other: &Self)
    where
        Self: Sized;
    fn get_pixel(&self, x: i32, y: i32) -> Option<Color>;
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if let Some(dst) = self.get_pixel(x, y) {
            self.set_pixel(x, y, dst.lerp(&color, alpha));
        }
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    fn present(&self) -> Result<()> {
        Ok(()) // Default does nothin
    }
    fn present_window(&self, _window: &mut Window) -> Result<()> {
        Ok(()) // Default implementation does nothing
    }
}

/// Packed 0x00RRGGBB pixels, the layout minifb blits directly.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
}

impl FrameBuffer {
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| x as usize + y as usize * self.width)
    }

    /// Copy out as an RGB image, e.g. for saving a PNG.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let c = Color::from_u32(self.data[x as usize + y as usize * self.width]);
            Rgb([c.r, c.g, c.b])
        })
    }
}

impl Buffer for FrameBuffer {
    fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            data: vec![Color::BLACK.to_u32(); width * height],
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data = vec![Color::BLACK.to_u32(); width * height];
    }

    fn clear(&mut self, color: Color) {
        let packed = color.to_u32();
        self.data.par_chunks_mut(PAR_CHUNK).for_each(|chunk| {
            chunk.fill(packed);
        });
    }

    fn fade(&mut self, color: Color, alpha: f32) {
        self.data.par_chunks_mut(PAR_CHUNK).for_each(|chunk| {
            for point in chunk {
                *point = Color::from_u32(*point).fade_towards(&color, alpha).to_u32();
            }
        });
    }

    fn copy_from(&mut self, other: &Self) {
        if self.data.len() == other.data.len() {
            self.data.copy_from_slice(&other.data);
        } else {
            self.clear(Color::BLACK);
        }
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| Color::from_u32(self.data[i]))
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = color.to_u32();
        }
    }

    fn present_window(&self, window: &mut Window) -> Result<()> {
        window
            .update_with_buffer(&self.data, self.width, self.height)
            .map_err(|e| ToasterError::window(e.to_string()))
    }
}

/// Terminal surface. Each character cell holds two pixels stacked
/// vertically, drawn as an upper half block with fg = top and bg = bottom.
pub struct TermBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<Color>,
}

impl TermBuffer {
    /// Pixel size for a terminal of `cols` x `rows` cells.
    pub fn dims_for_terminal(cols: u16, rows: u16) -> (usize, usize) {
        (cols as usize, rows as usize * 2)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| x as usize + y as usize * self.width)
    }
}

impl Buffer for TermBuffer {
    fn new(width: usize, height: usize) -> Self {
        TermBuffer {
            width,
            height,
            data: vec![Color::BLACK; width * height],
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data = vec![Color::BLACK; width * height];
    }

    fn clear(&mut self, color: Color) {
        self.data.par_chunks_mut(PAR_CHUNK).for_each(|chunk| {
            chunk.fill(color);
        });
    }

    fn fade(&mut self, color: Color, alpha: f32) {
        self.data.par_chunks_mut(PAR_CHUNK).for_each(|chunk| {
            for point in chunk {
                *point = point.fade_towards(&color, alpha);
            }
        });
    }

    fn copy_from(&mut self, other: &Self) {
        if self.data.len() == other.data.len() {
            self.data.copy_from_slice(&other.data);
        } else {
            self.clear(Color::BLACK);
        }
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.data[i])
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = color;
        }
    }

    fn present(&self) -> Result<()> {
        let mut stdout = stdout();
        // Only emit color escapes when they actually change
        let mut last: Option<(Color, Color)> = None;

        for row in 0..self.height / 2 {
            queue!(stdout, MoveTo(0, row as u16))?;
            for x in 0..self.width {
                let top = self.data[x + row * 2 * self.width];
                let bottom = self.data[x + (row * 2 + 1) * self.width];
                if last != Some((top, bottom)) {
                    queue!(
                        stdout,
                        SetForegroundColor(top.to_crossterm_color()),
                        SetBackgroundColor(bottom.to_crossterm_color())
                    )?;
                    last = Some((top, bottom));
                }
                queue!(stdout, Print('▀'))?;
            }
        }

        queue!(stdout, ResetColor)?;
        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_outside_are_dropped() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.set_pixel(-1, 0, Color::WHITE);
        fb.set_pixel(4, 0, Color::WHITE);
        fb.set_pixel(0, 3, Color::WHITE);
        assert!(fb.data.iter().all(|&p| p == 0));
        assert_eq!(fb.get_pixel(-1, 0), None);
    }

    #[test]
    fn clear_and_read_back() {
        let mut fb = FrameBuffer::new(40, 30);
        fb.clear(Color::NIGHT);
        assert_eq!(fb.get_pixel(39, 29), Some(Color::NIGHT));
        fb.set_pixel(2, 1, Color::TOASTER_CYAN);
        assert_eq!(fb.get_pixel(2, 1), Some(Color::TOASTER_CYAN));
    }

    #[test]
    fn fade_moves_towards_background() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(0, 0, Color::WHITE);
        fb.fade(Color::BLACK, 0.25);
        let c = fb.get_pixel(0, 0).unwrap();
        assert!(c.r < 255 && c.r > 128);
        // repeated fading converges on the background
        for _ in 0..64 {
            fb.fade(Color::BLACK, 0.25);
        }
        assert_eq!(fb.get_pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn blend_full_alpha_replaces() {
        let mut tb = TermBuffer::new(3, 4);
        tb.blend_pixel(1, 1, Color::TOASTER_MAGENTA, 1.0);
        assert_eq!(tb.get_pixel(1, 1), Some(Color::TOASTER_MAGENTA));
        tb.blend_pixel(1, 2, Color::WHITE, 0.0);
        assert_eq!(tb.get_pixel(1, 2), Some(Color::BLACK));
    }

    #[test]
    fn resize_reallocates() {
        let mut tb = TermBuffer::new(3, 4);
        tb.resize(10, 8);
        assert_eq!(tb.data.len(), 80);
        assert!(tb.in_bounds(9, 7));
        assert!(!tb.in_bounds(10, 7));
    }

    #[test]
    fn image_export_matches_pixels() {
        let mut fb = FrameBuffer::new(5, 5);
        fb.set_pixel(3, 4, Color::new(1, 2, 3));
        let img = fb.to_image();
        assert_eq!(img.get_pixel(3, 4), &Rgb([1, 2, 3]));
        assert_eq!(img.dimensions(), (5, 5));
    }

    #[test]
    fn terminal_cells_hold_two_rows() {
        assert_eq!(TermBuffer::dims_for_terminal(80, 24), (80, 48));
    }
}
