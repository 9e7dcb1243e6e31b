use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::classification::domain::emotion_classifier::{ClassificationError, EmotionClassifier};
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::MAX_FRAME_DIMENSION;
use crate::shared::face_crop::FaceCrop;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;
use crate::video::domain::frame_source::FrameSource;

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("failed to open recording {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("frame on line {line} is {width}x{height}, larger than {max}x{max}")]
    FrameTooLarge {
        line: usize,
        width: u32,
        height: u32,
        max: u32,
    },
    #[error("invalid frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One face as captured from a detector + classifier run.
///
/// A face with an `error`, or without an `emotion`, replays as a
/// classifier failure.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RecordedFace {
    #[serde(flatten)]
    pub region: FaceRegion,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RecordedFace {
    pub fn outcome(&self) -> Result<String, ClassificationError> {
        if let Some(msg) = &self.error {
            return Err(ClassificationError::Backend(msg.clone()));
        }
        self.emotion
            .clone()
            .ok_or(ClassificationError::NoFaceFeatures)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub faces: Vec<RecordedFace>,
}

/// A JSON-Lines recording: one frame object per non-blank line.
///
/// ```text
/// {"width":640,"height":480,"faces":[{"x":10,"y":20,"width":80,"height":80,"emotion":"happy"}]}
/// {"faces":[]}
/// {"faces":[{"x":12,"y":22,"width":80,"height":80,"error":"face could not be detected"}]}
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recording {
    frames: Vec<RecordedFrame>,
}

impl Recording {
    pub fn new(frames: Vec<RecordedFrame>) -> Self {
        Self { frames }
    }

    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let file = File::open(path).map_err(|source| RecordingError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file))
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self, RecordingError> {
        let mut frames = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|source| RecordingError::Read {
                line: line_no,
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let frame: RecordedFrame =
                serde_json::from_str(&line).map_err(|source| RecordingError::Parse {
                    line: line_no,
                    source,
                })?;
            if frame.width > MAX_FRAME_DIMENSION || frame.height > MAX_FRAME_DIMENSION {
                return Err(RecordingError::FrameTooLarge {
                    line: line_no,
                    width: frame.width,
                    height: frame.height,
                    max: MAX_FRAME_DIMENSION,
                });
            }
            frames.push(frame);
        }
        log::debug!("Loaded recording with {} frames", frames.len());
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn frame(&self, index: usize) -> Option<&RecordedFrame> {
        self.frames.get(index)
    }
}

/// Replays recorded frames as blank images of the recorded size.
pub struct RecordedFrameSource {
    recording: Arc<Recording>,
    next: usize,
}

impl RecordedFrameSource {
    pub fn new(recording: Arc<Recording>) -> Self {
        Self { recording, next: 0 }
    }
}

impl FrameSource for RecordedFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(recorded) = self.recording.frame(self.next) else {
            return Ok(None);
        };
        let frame = Frame::blank(recorded.width, recorded.height, self.next);
        self.next += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        self.next = self.recording.len();
    }
}

/// Replays the recorded face boxes for each frame index.
pub struct RecordedFaceDetector {
    recording: Arc<Recording>,
}

impl RecordedFaceDetector {
    pub fn new(recording: Arc<Recording>) -> Self {
        Self { recording }
    }
}

impl FaceDetector for RecordedFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        Ok(self
            .recording
            .frame(frame.index())
            .map(|f| f.faces.iter().map(|face| face.region).collect())
            .unwrap_or_default())
    }
}

/// Replays the recorded classifier outcome for a face, matched by frame
/// index and position in the frame's face list.
///
/// Position matters: two faces may share the same box and still carry
/// different outcomes. The region must agree with the recorded one.
pub struct RecordedEmotionClassifier {
    recording: Arc<Recording>,
}

impl RecordedEmotionClassifier {
    pub fn new(recording: Arc<Recording>) -> Self {
        Self { recording }
    }
}

impl EmotionClassifier for RecordedEmotionClassifier {
    fn classify(&mut self, face: &FaceCrop) -> Result<String, ClassificationError> {
        self.recording
            .frame(face.frame_index)
            .and_then(|f| f.faces.get(face.face_index))
            .filter(|r| r.region == face.region)
            .ok_or_else(|| {
                ClassificationError::Backend(format!(
                    "no recorded face #{} at {:?} in frame {}",
                    face.face_index, face.region, face.frame_index
                ))
            })?
            .outcome()
    }
}
