//! Centroid tracking with distance and speed estimates.
//!
//! Detections from any detector are associated with persistent track ids by
//! nearest-centroid matching, and every associated detection is annotated
//! with a nominal distance from the camera and a speed derived from the
//! track's two most recent positions.
//!
//! ```ignore
//! use speedtrack::{Detection, PipelineConfig, SpeedPipeline};
//!
//! let mut pipeline = SpeedPipeline::new(detector, PipelineConfig::default())?;
//! let summary = pipeline.run(&mut frames, &mut renderer, &stop);
//! ```

mod error;

pub mod integration;
pub mod tracker;

pub use error::{Error, Result};
pub use integration::{
    Annotation, ClassNames, DetectionBuilder, DetectionSource, Frame, FrameSource,
    IntoDetections, PipelineConfig, Recording, Renderer, RunSummary, SpeedPipeline, StopReason,
};
pub use tracker::{
    Association, AssociationPolicy, CentroidTracker, Detection, HISTORY_CAPACITY,
    KinematicsConfig, PositionHistory, Rect, Sample, Track, TrackId, TrackerConfig,
};
