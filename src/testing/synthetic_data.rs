//! Synthetic RGBA frames with controllable contrast

use crate::types::{FocusFrame, BYTES_PER_PIXEL};

const LIT: [u8; 4] = [255, 255, 255, 255];
const DARK: [u8; 4] = [0, 0, 0, 255];

/// Create a one-row frame of `pixels` pixels with `lit` white pixels, the rest black.
///
/// `lit` is capped at half the pixels, where the contrast score peaks; below
/// that the score grows strictly with `lit` for an even pixel count.
pub fn synthetic_focus_frame(pixels: usize, lit: usize) -> FocusFrame {
    let lit = lit.min(pixels / 2);
    let mut data = Vec::with_capacity(pixels * BYTES_PER_PIXEL);
    for i in 0..pixels {
        data.extend_from_slice(if i < lit { &LIT } else { &DARK });
    }
    FocusFrame::new(data, pixels as u32, 1)
}

/// Create a gradient test frame that changes with `frame_number`.
pub fn synthetic_gradient_frame(frame_number: u64, width: u32, height: u32) -> FocusFrame {
    let mut data = vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL];

    let base = (frame_number % 256) as u8;
    for y in 0..height {
        for x in 0..width {
            let idx = (y as usize * width as usize + x as usize) * BYTES_PER_PIXEL;
            data[idx] = base.wrapping_add((x % 256) as u8); // R
            data[idx + 1] = base.wrapping_add((y % 256) as u8); // G
            data[idx + 2] = base.wrapping_add(((x + y) % 256) as u8); // B
            data[idx + 3] = 255;
        }
    }

    FocusFrame::new(data, width, height)
}
