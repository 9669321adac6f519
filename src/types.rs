use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes per pixel in a focus frame: R, G, B and one ignored channel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Actuator step count, always within `FocusPosition::MIN..=FocusPosition::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FocusPosition(u16);

impl FocusPosition {
    pub const MIN: FocusPosition = FocusPosition(0);
    pub const MAX: FocusPosition = FocusPosition(u16::MAX);

    pub const fn new(steps: u16) -> Self {
        Self(steps)
    }

    pub const fn get(self) -> u16 {
        self.0
    }

    /// Move by a signed number of steps, `None` if the result leaves the range.
    pub fn offset(self, delta: i32) -> Option<FocusPosition> {
        let target = i32::from(self.0) + delta;
        u16::try_from(target).ok().map(FocusPosition)
    }

    /// Move by a signed number of steps, saturating at the range ends.
    pub fn offset_clamped(self, delta: i32) -> FocusPosition {
        let target = (i32::from(self.0) + delta).clamp(0, i32::from(u16::MAX));
        FocusPosition(target as u16)
    }
}

impl From<u16> for FocusPosition {
    fn from(steps: u16) -> Self {
        Self(steps)
    }
}

impl From<FocusPosition> for u16 {
    fn from(position: FocusPosition) -> Self {
        position.0
    }
}

impl fmt::Display for FocusPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Search direction along the actuator axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards larger step counts
    Far,
    /// Towards smaller step counts
    Near,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Direction::Far => 1,
            Direction::Near => -1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Far => Direction::Near,
            Direction::Near => Direction::Far,
        }
    }
}

/// A preview frame for focus analysis.
///
/// Pixels are interleaved as `[R, G, B, X]`; the fourth channel is ignored by
/// the contrast metric. Dimensions are informational only, the metric reads
/// the byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl FocusFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Build a frame from packed RGB24 data, filling the fourth channel with 255.
    pub fn from_rgb(rgb: &[u8], width: u32, height: u32) -> Self {
        let mut data = Vec::with_capacity(rgb.len() / 3 * BYTES_PER_PIXEL);
        for px in rgb.chunks_exact(3) {
            data.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Self::new(data, width, height)
    }

    /// Convert any decoded image into an RGBA8 focus frame.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(rgba.into_raw(), width, height)
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / BYTES_PER_PIXEL
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for FocusFrame {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
