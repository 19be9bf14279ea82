use super::{Canvas, Rgb};
use stance_base::Vec2;
use stance_video::Frame;

/// Coordinates further than this many canvas extents off the canvas are not drawn.
const DRAW_MARGIN: i64 = 4;

/// Canvas backed by an RGB8 buffer.
#[derive(Debug, Clone)]
pub struct RgbCanvas {
    frame: Frame,
}

impl RgbCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: Frame::filled(width, height, [0, 0, 0]),
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Pack pixels as `0x00RRGGBB`, the layout window toolkits such as minifb expect.
    pub fn to_argb(&self) -> Vec<u32> {
        self.frame
            .data()
            .chunks_exact(3)
            .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
            .collect()
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        let (w, h) = self.size();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return;
        }
        let idx = (y as usize * w as usize + x as usize) * 3;
        self.frame.data_mut()[idx..idx + 3].copy_from_slice(&color);
    }

    /// Round a coordinate to a pixel index, `None` when it is not finite or lies
    /// further than `DRAW_MARGIN` canvas extents from the canvas.
    fn to_pixel(&self, center: Vec2<f32>) -> Option<(i64, i64)> {
        let (w, h) = self.size();
        let limit = DRAW_MARGIN * (w.max(h) as i64).max(1);
        let round = |v: f32| {
            let v = v.round();
            (v.is_finite() && v.abs() <= limit as f32).then_some(v as i64)
        };
        Some((round(center.x)?, round(center.y)?))
    }
}

impl Canvas for RgbCanvas {
    fn size(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    fn draw_frame(&mut self, frame: &Frame) {
        let (w, h) = self.size();
        if frame.width() == w && frame.height() == h {
            self.frame.data_mut().copy_from_slice(frame.data());
            return;
        }
        if frame.width() == 0 || frame.height() == 0 {
            return;
        }

        // Nearest-neighbour scale
        for y in 0..h {
            let src_y = (y as u64 * frame.height() as u64 / h as u64) as u32;
            for x in 0..w {
                let src_x = (x as u64 * frame.width() as u64 / w as u64) as u32;
                if let Some(rgb) = frame.pixel(src_x, src_y) {
                    self.set_pixel(x as i64, y as i64, rgb);
                }
            }
        }
    }

    fn draw_point(&mut self, center: Vec2<f32>, radius: f32, color: Rgb) {
        let Some((cx, cy)) = self.to_pixel(center) else {
            return;
        };
        let r = if radius.is_finite() {
            radius.round().clamp(0.0, 64.0) as i64
        } else {
            0
        };
        let r2 = r * r;

        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r2 {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn draw_segment(&mut self, from: Vec2<f32>, to: Vec2<f32>, color: Rgb) {
        let (w, h) = self.size();
        let (Some((fx, fy)), Some((tx, ty))) = (self.to_pixel(from), self.to_pixel(to)) else {
            return;
        };
        let Some((mut x0, mut y0, x1, y1)) = clip_segment(fx, fy, tx, ty, w as i64, h as i64)
        else {
            return;
        };

        // Bresenham
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            self.set_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x0 += sx;
            }
            if e2 < dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

// Cohen-Sutherland outcodes
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

fn outcode(x: i64, y: i64, width: i64, height: i64) -> u8 {
    let mut code = INSIDE;
    if x < 0 {
        code |= LEFT;
    } else if x >= width {
        code |= RIGHT;
    }
    if y < 0 {
        code |= TOP;
    } else if y >= height {
        code |= BOTTOM;
    }
    code
}

/// Clip a segment to `[0, width) x [0, height)`; `None` when nothing is visible.
fn clip_segment(
    mut x0: i64,
    mut y0: i64,
    mut x1: i64,
    mut y1: i64,
    width: i64,
    height: i64,
) -> Option<(i64, i64, i64, i64)> {
    if width <= 0 || height <= 0 {
        return None;
    }
    loop {
        let code0 = outcode(x0, y0, width, height);
        let code1 = outcode(x1, y1, width, height);

        if code0 | code1 == INSIDE {
            return Some((x0, y0, x1, y1));
        }
        if code0 & code1 != 0 {
            return None;
        }

        let code = if code0 != INSIDE { code0 } else { code1 };
        let (dx, dy) = (x1 - x0, y1 - y0);
        let (x, y) = if code & TOP != 0 {
            (x0 + dx * -y0 / dy, 0)
        } else if code & BOTTOM != 0 {
            (x0 + dx * (height - 1 - y0) / dy, height - 1)
        } else if code & LEFT != 0 {
            (0, y0 + dy * -x0 / dx)
        } else {
            (width - 1, y0 + dy * (width - 1 - x0) / dx)
        };

        if code == code0 {
            x0 = x;
            y0 = y;
        } else {
            x1 = x;
            y1 = y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_segment_inside_unchanged() {
        assert_eq!(clip_segment(1, 1, 5, 5, 10, 10), Some((1, 1, 5, 5)));
    }

    #[test]
    fn test_clip_segment_crossing() {
        assert_eq!(clip_segment(-5, 5, 15, 5, 10, 10), Some((0, 5, 9, 5)));
    }

    #[test]
    fn test_clip_segment_fully_outside() {
        assert_eq!(clip_segment(-5, -5, -1, -1, 10, 10), None);
        assert_eq!(clip_segment(0, 0, 5, 5, 0, 10), None);
    }

    #[test]
    fn test_clip_segment_wide_span() {
        assert_eq!(
            clip_segment(-3_000_000_000, 5, 3_000_000_000, 5, 10, 10),
            Some((0, 5, 9, 5))
        );
    }

    #[test]
    fn test_to_pixel_rejects_far_and_non_finite() {
        let canvas = RgbCanvas::new(10, 10);
        assert_eq!(canvas.to_pixel(Vec2::new(2.4, 7.6)), Some((2, 8)));
        assert_eq!(canvas.to_pixel(Vec2::new(-40.0, 0.0)), Some((-40, 0)));
        assert_eq!(canvas.to_pixel(Vec2::new(41.0, 0.0)), None);
        assert_eq!(canvas.to_pixel(Vec2::new(f32::NAN, 0.0)), None);
        assert_eq!(canvas.to_pixel(Vec2::new(0.0, f32::INFINITY)), None);
    }
}
