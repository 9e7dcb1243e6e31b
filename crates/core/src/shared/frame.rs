use ndarray::{s, ArrayView3};

use crate::shared::region::FaceRegion;

/// A single captured frame: contiguous RGB bytes in row-major order.
///
/// Pixel format conversion belongs to the frame source; the session layer
/// treats pixel data as opaque and only ever slices it into face crops.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A black RGB frame, used by sources that carry no pixel data.
    pub fn blank(width: u32, height: u32, index: usize) -> Self {
        let len = width as usize * height as usize * 3;
        Self::new(vec![0; len], width, height, 3, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels under `region` into a new frame with the same index.
    ///
    /// The region is clamped to the frame first, so an off-frame box yields
    /// an empty (0-sized) crop instead of panicking.
    pub fn crop(&self, region: &FaceRegion) -> Frame {
        let r = region.clamped(self.width, self.height);
        let (x1, y1) = (r.x as usize, r.y as usize);
        let (x2, y2) = (x1 + r.width as usize, y1 + r.height as usize);
        let data: Vec<u8> = self
            .as_ndarray()
            .slice(s![y1..y2, x1..x2, ..])
            .iter()
            .copied()
            .collect();
        Frame::new(
            data,
            r.width as u32,
            r.height as u32,
            self.channels,
            self.index,
        )
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
