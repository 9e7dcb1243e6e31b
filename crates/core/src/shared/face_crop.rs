use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// One detected face handed to the emotion classifier.
///
/// Carries the source frame index, the face's position in the detector's
/// output and the (unclamped) region alongside the cropped pixels, so
/// classifiers that work from recorded output can look the face up without
/// touching pixel data.
#[derive(Clone, Debug)]
pub struct FaceCrop {
    pub frame_index: usize,
    pub face_index: usize,
    pub region: FaceRegion,
    pub image: Frame,
}

impl FaceCrop {
    pub fn from_frame(frame: &Frame, region: FaceRegion, face_index: usize) -> Self {
        Self {
            frame_index: frame.index(),
            face_index,
            region,
            image: frame.crop(&region),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image.data().is_empty()
    }
}
