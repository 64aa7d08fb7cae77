//! Integration module connecting frame sources, detectors and renderers to
//! the tracker.
//!
//! Any inference backend plugs in through [`DetectionSource`]; frames arrive
//! through [`FrameSource`] and annotated results leave through [`Renderer`].

mod annotation;
mod builder;
mod class_names;
mod detector;
mod pipeline;
pub mod replay;

pub use annotation::Annotation;
pub use builder::DetectionBuilder;
pub use class_names::ClassNames;
pub use detector::{DetectionSource, Frame, FrameSource, IntoDetections, Renderer};
pub use pipeline::{PipelineConfig, RunSummary, SpeedPipeline, StopReason};
pub use replay::Recording;
