//! Raster surface contract used by the simulation.
//!
//! Particles and fireworks only ever draw filled disks, so the drawing
//! capability they need is reduced to [`Surface::fill_disk`] plus the
//! [`fade`] colour function. [`image::RgbImage`] implements the trait for
//! real frames; tests can supply their own recorders.

use image::{Rgb, RgbImage};

use crate::shapes::rasterize_disk;

/// An 8-bit RGB colour triple.
pub type Color = [u8; 3];

/// Pure black, the background of every frame.
pub const BLACK: Color = [0, 0, 0];

/// A raster target supporting clipped filled-disk composites.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Fill a disk of `radius` centred on `(cx, cy)` with `color`.
    ///
    /// Pixels outside the surface are dropped silently. Existing pixels are
    /// overwritten, so the last disk drawn wins where disks overlap.
    fn fill_disk(&mut self, cx: i32, cy: i32, radius: u32, color: Color);
}

impl Surface for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn fill_disk(&mut self, cx: i32, cy: i32, radius: u32, color: Color) {
        let (w, h) = self.dimensions();
        for (x, y) in rasterize_disk(cx, cy, radius) {
            if x < 0 || y < 0 || x as u32 >= w || y as u32 >= h {
                continue;
            }
            self.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
}

/// Scale `color` by `remaining / lifetime`.
///
/// Each channel becomes `floor(channel * remaining / lifetime)`, computed in
/// integers so the result is exact. A zero `lifetime` fades to black.
///
/// # Examples
///
/// ```
/// use skyburst::surface::fade;
///
/// assert_eq!(fade([200, 100, 255], 1, 2), [100, 50, 127]);
/// assert_eq!(fade([200, 100, 255], 0, 2), [0, 0, 0]);
/// ```
pub fn fade(color: Color, remaining: u32, lifetime: u32) -> Color {
    if lifetime == 0 {
        return BLACK;
    }
    let remaining = remaining.min(lifetime) as u64;
    let lifetime = lifetime as u64;
    color.map(|c| (c as u64 * remaining / lifetime) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_full_life_is_identity() {
        assert_eq!(fade([255, 180, 150], 80, 80), [255, 180, 150]);
    }

    #[test]
    fn test_fade_floors_each_channel() {
        // 255 * 7 / 10 = 178.5 -> 178
        assert_eq!(fade([255, 10, 1], 7, 10), [178, 7, 0]);
    }

    #[test]
    fn test_fade_monotonic() {
        let color = [240, 200, 160];
        let mut previous = fade(color, 100, 100);
        for remaining in (0..100).rev() {
            let current = fade(color, remaining, 100);
            for ch in 0..3 {
                assert!(current[ch] <= previous[ch]);
            }
            previous = current;
        }
        assert_eq!(previous, BLACK);
    }

    #[test]
    fn test_fade_zero_lifetime() {
        assert_eq!(fade([255, 255, 255], 3, 0), BLACK);
    }

    #[test]
    fn test_fill_disk_inside() {
        let mut img = RgbImage::new(10, 10);
        img.fill_disk(5, 5, 1, [255, 0, 0]);
        assert_eq!(img.get_pixel(5, 5), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(4, 5), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(5, 6), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(6, 6), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_fill_disk_clips_at_edges() {
        let mut img = RgbImage::new(4, 4);
        img.fill_disk(0, 0, 2, [0, 255, 0]);
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(2, 0), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(3, 3), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_fill_disk_fully_offscreen_is_noop() {
        let mut img = RgbImage::new(4, 4);
        img.fill_disk(-50, 200, 3, [255, 255, 255]);
        img.fill_disk(i32::MIN / 2, i32::MAX / 2, 2, [255, 255, 255]);
        assert!(img.pixels().all(|p| p.0 == BLACK));
    }

    #[test]
    fn test_fill_disk_last_draw_wins() {
        let mut img = RgbImage::new(8, 8);
        img.fill_disk(4, 4, 2, [255, 0, 0]);
        img.fill_disk(4, 4, 0, [0, 0, 255]);
        assert_eq!(img.get_pixel(4, 4), &Rgb([0, 0, 255]));
        assert_eq!(img.get_pixel(3, 4), &Rgb([255, 0, 0]));
    }
}
