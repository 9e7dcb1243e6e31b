use serde::{Deserialize, Serialize};

/// A face bounding box reported by the detector, in frame pixel coordinates.
///
/// Detectors may report boxes that hang off the frame edge; use
/// [`FaceRegion::clamped`] before indexing pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in pixels; zero for degenerate (non-positive) boxes.
    pub fn area(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersects the region with a `frame_width` × `frame_height` frame.
    ///
    /// Boxes entirely outside the frame collapse to a zero-sized region at
    /// the nearest edge rather than disappearing, matching array slicing.
    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> FaceRegion {
        let fw = frame_width as i32;
        let fh = frame_height as i32;
        let x1 = self.x.clamp(0, fw);
        let y1 = self.y.clamp(0, fh);
        let x2 = self.x.saturating_add(self.width.max(0)).clamp(0, fw);
        let y2 = self.y.saturating_add(self.height.max(0)).clamp(0, fh);
        FaceRegion {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }
}
