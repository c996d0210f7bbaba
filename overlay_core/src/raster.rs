// Software rasteriser for hosts that blit pixels instead of drawing vectors.
// RGBA8, row-major, straight alpha. Pixels are sampled at their centres.

use crate::error::OverlayError;
use crate::types::*;

/// Pixel buffer the size of the overlay surface.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, OverlayError> {
        if width == 0 || height == 0 {
            return Err(OverlayError::Surface {
                width,
                height,
                message: "canvas needs a non-empty size".to_string(),
            });
        }

        Ok(Canvas {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Colour at (x, y). Out of bounds reads as transparent.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        match self.index(x as i64, y as i64) {
            Some(i) => Rgba::new(
                self.pixels[i],
                self.pixels[i + 1],
                self.pixels[i + 2],
                self.pixels[i + 3],
            ),
            None => Rgba::TRANSPARENT,
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Clear, then paint `frame`'s commands in order.
    pub fn render(&mut self, frame: &Frame) {
        self.clear();
        for command in &frame.commands {
            self.draw(command);
        }
    }

    pub fn draw(&mut self, command: &DrawCommand) {
        match *command {
            DrawCommand::Fill { color } => self.fill(color),
            DrawCommand::ClearCircle { center, radius } => self.clear_circle(center, radius),
            DrawCommand::Ring {
                center,
                inner_radius,
                outer_radius,
                color,
            } => self.ring(center, inner_radius, outer_radius, color),
            DrawCommand::Dot {
                center,
                radius,
                color,
            } => self.disc(center, radius, color),
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    fn fill(&mut self, color: Rgba) {
        for y in 0..self.height as i64 {
            for x in 0..self.width as i64 {
                self.blend(x, y, color);
            }
        }
    }

    fn clear_circle(&mut self, center: ScreenPoint, radius: f32) {
        let radius = radius.max(0.0);
        self.for_each_in_radius(center, radius, |canvas, x, y, d| {
            if d <= radius {
                canvas.set(x, y, Rgba::TRANSPARENT);
            }
        });
    }

    fn ring(&mut self, center: ScreenPoint, inner: f32, outer: f32, color: Rgba) {
        let inner = inner.max(0.0);
        let outer = outer.max(inner);
        let width = outer - inner;
        if width <= 0.0 {
            return;
        }

        self.for_each_in_radius(center, outer, |canvas, x, y, d| {
            if d < inner || d > outer {
                return;
            }
            // Strongest midway through the band, transparent at both edges.
            let t = (d - inner) / width;
            let strength = 1.0 - (2.0 * t - 1.0).abs();
            canvas.blend(x, y, color.fade(strength));
        });
    }

    fn disc(&mut self, center: ScreenPoint, radius: f32, color: Rgba) {
        let radius = radius.max(0.0);
        self.for_each_in_radius(center, radius, |canvas, x, y, d| {
            if d <= radius {
                canvas.blend(x, y, color);
            }
        });
    }

    /// Visit pixels in the bounding box of a circle with their centre distance.
    fn for_each_in_radius<F>(&mut self, center: ScreenPoint, radius: f32, mut visit: F)
    where
        F: FnMut(&mut Canvas, i64, i64, f32),
    {
        let x0 = ((center.x - radius).floor() as i64).max(0);
        let y0 = ((center.y - radius).floor() as i64).max(0);
        let x1 = ((center.x + radius).ceil() as i64).min(self.width as i64 - 1);
        let y1 = ((center.y + radius).ceil() as i64).min(self.height as i64 - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = center.distance_to(ScreenPoint::new(x as f32 + 0.5, y as f32 + 0.5));
                visit(self, x, y, d);
            }
        }
    }

    fn set(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Source-over blend with straight alpha.
    fn blend(&mut self, x: i64, y: i64, src: Rgba) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if src.a == 0 {
            return;
        }

        let sa = src.a as f32 / 255.0;
        let da = self.pixels[i + 3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);

        let mix = |s: u8, d: u8| -> u8 {
            let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        let out = [
            mix(src.r, self.pixels[i]),
            mix(src.g, self.pixels[i + 1]),
            mix(src.b, self.pixels[i + 2]),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ];
        self.pixels[i..i + 4].copy_from_slice(&out);
    }
}
