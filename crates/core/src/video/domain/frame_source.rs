use crate::shared::frame::Frame;

/// Pulls frames from a live camera, a file, or a recording.
///
/// `Ok(None)` means the source is exhausted or the device stopped
/// delivering frames; the pipeline ends the session loop on it.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the device or file handle.
    fn close(&mut self);
}
