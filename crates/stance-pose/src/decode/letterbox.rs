use stance_base::Vec2;
use stance_video::Frame;

/// Side length of the square network input.
pub const INPUT_SIZE: usize = 640;
const PAD_VALUE: f32 = 114.0 / 255.0;

/// Scale and padding applied when fitting a frame into the network input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
}

impl Letterbox {
    /// Map a point from network input space back to frame pixels.
    pub fn to_frame(&self, x: f32, y: f32) -> Vec2<f32> {
        Vec2::new((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }
}

/// Resize `frame` into a gray-padded `INPUT_SIZE` square, keeping its aspect ratio.
///
/// Returns NCHW data of shape `[1, 3, INPUT_SIZE, INPUT_SIZE]` in `[0, 1]` and the
/// transform needed to map detections back to frame pixels. Empty frames yield
/// an all-padding input.
pub fn letterbox(frame: &Frame) -> (Vec<f32>, Letterbox) {
    let plane = INPUT_SIZE * INPUT_SIZE;
    let mut nchw = vec![PAD_VALUE; 3 * plane];

    let (w, h) = (frame.width() as usize, frame.height() as usize);
    if w == 0 || h == 0 {
        let identity = Letterbox {
            scale: 1.0,
            pad_x: 0.0,
            pad_y: 0.0,
        };
        return (nchw, identity);
    }

    let scale = (INPUT_SIZE as f32 / w as f32).min(INPUT_SIZE as f32 / h as f32);
    let new_w = ((w as f32 * scale) as usize).min(INPUT_SIZE);
    let new_h = ((h as f32 * scale) as usize).min(INPUT_SIZE);
    let pad_x = (INPUT_SIZE - new_w) / 2;
    let pad_y = (INPUT_SIZE - new_h) / 2;

    let data = frame.data();
    for y in 0..new_h {
        let src_y = ((y as f32 / scale) as usize).min(h - 1);
        for x in 0..new_w {
            let src_x = ((x as f32 / scale) as usize).min(w - 1);
            let src = (src_y * w + src_x) * 3;
            let dst = (y + pad_y) * INPUT_SIZE + (x + pad_x);
            for ch in 0..3 {
                nchw[ch * plane + dst] = data[src + ch] as f32 / 255.0;
            }
        }
    }

    let info = Letterbox {
        scale,
        pad_x: pad_x as f32,
        pad_y: pad_y as f32,
    };
    (nchw, info)
}
