use std::time::Instant;

use crate::classification::domain::emotion_classifier::{label_or_unknown, EmotionClassifier};
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::session::domain::session_aggregator::SessionAggregator;
use crate::shared::face_crop::FaceCrop;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;
use crate::video::domain::frame_source::FrameSource;

/// Overlay data for one face: where it is and what to write over it.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceAnnotation {
    pub region: FaceRegion,
    pub raw_label: String,
    pub smoothed_label: String,
}

/// Everything the caller needs to draw one processed frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub frame_index: usize,
    pub faces: Vec<FaceAnnotation>,
}

/// Per-frame callback. Returning `false` stops the session.
pub type FrameCallback = Box<dyn FnMut(&FrameReport) -> bool + Send>;

/// Live session loop: acquire → detect → classify each face → aggregate.
///
/// The aggregator's running flag is re-checked before every frame, so a
/// stop requested from the callback (or by anything else holding the
/// aggregator between runs) takes effect within one frame.
pub struct EmotionSessionUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    classifier: Box<dyn EmotionClassifier>,
    logger: Box<dyn PipelineLogger>,
    on_frame: Option<FrameCallback>,
}

impl EmotionSessionUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        classifier: Box<dyn EmotionClassifier>,
        logger: Box<dyn PipelineLogger>,
        on_frame: Option<FrameCallback>,
    ) -> Self {
        Self {
            source,
            detector,
            classifier,
            logger,
            on_frame,
        }
    }

    /// Drives frames through the aggregator until the source runs dry or
    /// the session is stopped. Returns the number of frames consumed.
    ///
    /// The aggregator must already be running (call `reset()` first);
    /// a stopped aggregator consumes no frames. Detector and source errors
    /// abort the run; classifier errors never do.
    pub fn execute(
        &mut self,
        aggregator: &mut SessionAggregator,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        if !aggregator.is_running() {
            self.logger.info("Session is stopped; nothing to process");
        }
        let result = self.run(aggregator);
        self.source.close();
        self.logger.summary();
        result
    }

    fn run(&mut self, aggregator: &mut SessionAggregator) -> Result<usize, Box<dyn std::error::Error>> {
        let mut processed = 0;

        while aggregator.is_running() {
            let Some(frame) = self.source.next_frame()? else {
                self.logger.info("Frame source exhausted");
                break;
            };
            aggregator.on_frame();
            processed += 1;

            let report = self.process_frame(&frame, aggregator)?;
            self.logger
                .progress(aggregator.frame_count(), aggregator.counts().total());

            if let Some(callback) = self.on_frame.as_mut() {
                if !callback(&report) {
                    aggregator.stop();
                }
            }
        }

        Ok(processed)
    }

    fn process_frame(
        &mut self,
        frame: &Frame,
        aggregator: &mut SessionAggregator,
    ) -> Result<FrameReport, Box<dyn std::error::Error>> {
        let t0 = Instant::now();
        let regions = self.detector.detect(frame)?;
        self.logger
            .timing("detect", t0.elapsed().as_secs_f64() * 1000.0);
        self.logger.metric("faces_per_frame", regions.len() as f64);

        let unknown = aggregator.config().unknown_label.clone();
        let mut faces = Vec::with_capacity(regions.len());
        for (face_index, region) in regions.into_iter().enumerate() {
            let crop = FaceCrop::from_frame(frame, region, face_index);

            let t0 = Instant::now();
            let result = self.classifier.classify(&crop);
            self.logger
                .timing("classify", t0.elapsed().as_secs_f64() * 1000.0);

            let raw_label = label_or_unknown(result, &unknown);
            let smoothed_label = aggregator.push_raw_label(&raw_label);
            faces.push(FaceAnnotation {
                region,
                raw_label,
                smoothed_label,
            });
        }

        Ok(FrameReport {
            frame_index: frame.index(),
            faces,
        })
    }
}
