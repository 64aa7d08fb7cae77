//! SpeedPipeline for combining detection, tracking and kinematics.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::integration::{Annotation, ClassNames, DetectionSource, Frame, FrameSource, Renderer};
use crate::tracker::{
    CentroidTracker, Detection, HISTORY_CAPACITY, KinematicsConfig, TrackerConfig,
};

/// Everything tunable about a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Detections scoring below this never reach the tracker
    pub confidence_threshold: f32,
    pub tracker: TrackerConfig,
    pub kinematics: KinematicsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            tracker: TrackerConfig::default(),
            kinematics: KinematicsConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::InvalidConfidence(self.confidence_threshold));
        }
        self.tracker.validate()?;
        self.kinematics.validate()
    }
}

/// Why [`SpeedPipeline::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The frame source reported the end of the stream
    EndOfStream,
    /// The frame source failed; treated as the end of the stream
    SourceFailed,
    /// The stop flag was raised
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub annotations: u64,
    pub stop_reason: StopReason,
}

/// A frame-synchronous pipeline that bundles a `DetectionSource` with the
/// centroid tracker and the kinematics estimates.
///
/// The pipeline owns the track table: it is created with the pipeline,
/// updated once per processed frame and dropped with it.
pub struct SpeedPipeline<D: DetectionSource, const N: usize = HISTORY_CAPACITY> {
    detector: D,
    tracker: CentroidTracker<N>,
    kinematics: KinematicsConfig,
    confidence_threshold: f32,
    class_names: ClassNames,
}

impl<D: DetectionSource, const N: usize> SpeedPipeline<D, N> {
    /// Create a new pipeline, rejecting invalid configuration values.
    pub fn new(detector: D, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let PipelineConfig {
            confidence_threshold,
            tracker,
            kinematics,
        } = config;
        Ok(Self {
            detector,
            tracker: CentroidTracker::new(tracker),
            kinematics,
            confidence_threshold,
            class_names: ClassNames::default(),
        })
    }

    /// Create a new pipeline with the default configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self {
            detector,
            tracker: CentroidTracker::default(),
            kinematics: KinematicsConfig::default(),
            confidence_threshold: PipelineConfig::default().confidence_threshold,
            class_names: ClassNames::default(),
        }
    }

    /// Use `class_names` for annotation labels.
    pub fn with_class_names(mut self, class_names: ClassNames) -> Self {
        self.class_names = class_names;
        self
    }

    /// Detect, associate and annotate a single frame.
    ///
    /// A detector error leaves the tracker untouched.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<Vec<Annotation>, D::Error> {
        let detections = self.detector.detect(&frame.data, frame.width, frame.height)?;
        Ok(self.annotate(detections, frame))
    }

    /// Associate already-detected objects of `frame` and annotate them.
    pub fn annotate(&mut self, detections: Vec<Detection>, frame: &Frame) -> Vec<Annotation> {
        let total = detections.len();
        let detections: Vec<Detection> = detections
            .into_iter()
            .filter(|d| d.score >= self.confidence_threshold)
            .collect();
        if detections.len() < total {
            debug!(
                "dropped {} detections below confidence {}",
                total - detections.len(),
                self.confidence_threshold
            );
        }

        self.tracker
            .update(detections, frame.timestamp)
            .into_iter()
            .map(|association| {
                let detection = association.detection;
                Annotation {
                    track_id: association.track_id,
                    class_id: detection.class_id,
                    label: self.class_names.label(detection.class_id),
                    score: detection.score,
                    distance: self.kinematics.distance(detection.bbox.width, frame.width),
                    speed: self.kinematics.speed(&association.history),
                    bbox: detection.bbox,
                }
            })
            .collect()
    }

    /// Process frames until the source ends or `stop` is raised.
    ///
    /// `stop` is checked before each frame; a frame that has started is
    /// always finished and rendered.
    pub fn run<F, R>(&mut self, frames: &mut F, renderer: &mut R, stop: &AtomicBool) -> RunSummary
    where
        F: FrameSource,
        R: Renderer,
    {
        info!("pipeline started");
        let mut summary = RunSummary {
            frames: 0,
            annotations: 0,
            stop_reason: StopReason::EndOfStream,
        };

        loop {
            if stop.load(Ordering::Relaxed) {
                summary.stop_reason = StopReason::Stopped;
                break;
            }

            let frame = match frames.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(err) => {
                    warn!("frame source failed, ending stream: {err}");
                    summary.stop_reason = StopReason::SourceFailed;
                    break;
                }
            };

            let annotations = match self.process_frame(&frame) {
                Ok(annotations) => annotations,
                Err(err) => {
                    warn!("detector failed on frame at {:.3}s: {err}", frame.timestamp);
                    self.annotate(Vec::new(), &frame)
                }
            };

            summary.frames += 1;
            summary.annotations += annotations.len() as u64;

            if let Err(err) = renderer.render(&frame, &annotations) {
                warn!("renderer failed on frame at {:.3}s: {err}", frame.timestamp);
            }
        }

        info!(
            "pipeline stopped ({:?}) after {} frames, {} tracks created",
            summary.stop_reason,
            summary.frames,
            self.tracker.tracks_created()
        );
        summary
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &CentroidTracker<N> {
        &self.tracker
    }

    pub fn kinematics(&self) -> &KinematicsConfig {
        &self.kinematics
    }
}
