//! Traits for the collaborators around the tracker: frame capture, object
//! detection and rendering.

use std::fmt;

use crate::integration::Annotation;
use crate::tracker::Detection;

/// One captured image with its capture time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Capture time in seconds, non-decreasing across a stream
    pub timestamp: f64,
    /// Raw image bytes, format agreed between the frame source and the detector
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, timestamp: f64) -> Self {
        Self {
            width,
            height,
            timestamp,
            data: Vec::new(),
        }
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}

/// Supplier of successive frames (camera, video file, recording).
pub trait FrameSource {
    type Error: fmt::Display;

    /// Next frame, or `Ok(None)` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
}

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the tracker.
///
/// # Example
///
/// ```ignore
/// use speedtrack::{DetectionSource, Detection};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error: fmt::Display;

    /// Run inference on raw image data and return detections in the
    /// detector's output order.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `Detection`.
pub trait IntoDetections {
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

/// `(class_id, score, [x1, y1, x2, y2])` tuples, the layout most YOLO
/// post-processing code produces.
impl IntoDetections for Vec<(usize, f32, [f32; 4])> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter()
            .map(|(class_id, score, [x1, y1, x2, y2])| {
                Detection::new(x1, y1, x2, y2, score).with_class(class_id)
            })
            .collect()
    }
}

/// Consumer of annotated frames. Renderers never feed back into tracking.
pub trait Renderer {
    type Error: fmt::Display;

    fn render(&mut self, frame: &Frame, annotations: &[Annotation]) -> Result<(), Self::Error>;
}

/// Discards everything.
impl Renderer for () {
    type Error = std::convert::Infallible;

    fn render(&mut self, _frame: &Frame, _annotations: &[Annotation]) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_detections() {
        let raw = vec![(3usize, 0.7f32, [10.0, 20.0, 50.0, 80.0])];
        let dets = raw.into_detections();

        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].class_id, 3);
        assert_eq!(dets[0].score, 0.7);
        assert_eq!(dets[0].bbox.to_tlbr(), [10.0, 20.0, 50.0, 80.0]);
    }

    #[test]
    fn test_frame_builder() {
        let frame = Frame::new(640, 480, 1.5).with_data(vec![0; 4]);
        assert_eq!((frame.width, frame.height), (640, 480));
        assert_eq!(frame.data.len(), 4);
    }
}
