use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Domain interface for face detection.
///
/// Returns zero or more face boxes per frame, in no particular order.
/// Implementations may be stateful, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>>;
}
