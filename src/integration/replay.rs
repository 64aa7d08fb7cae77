//! Offline replay of recorded detections.
//!
//! A recording is a JSON-lines file, one frame per line:
//!
//! ```text
//! {"timestamp": 0.033, "width": 640, "height": 480,
//!  "detections": [{"class_id": 0, "confidence": 0.91, "bbox": [12, 40, 96, 230]}]}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error, Result};
use crate::integration::{DetectionSource, Frame, FrameSource};
use crate::tracker::Detection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedDetection {
    pub class_id: usize,
    pub confidence: f32,
    /// `[x1, y1, x2, y2]` in pixels
    pub bbox: [f32; 4],
}

impl From<&RecordedDetection> for Detection {
    fn from(d: &RecordedDetection) -> Self {
        let [x1, y1, x2, y2] = d.bbox;
        Detection::new(x1, y1, x2, y2, d.confidence).with_class(d.class_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<RecordedDetection>,
}

#[derive(Debug, Clone, Default)]
pub struct Recording {
    frames: Vec<RecordedFrame>,
}

impl Recording {
    pub fn new(frames: Vec<RecordedFrame>) -> Self {
        Self { frames }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut frames = Vec::new();
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let frame = serde_json::from_str(line).map_err(|source| Error::Recording {
                line: idx + 1,
                source,
            })?;
            frames.push(frame);
        }
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

    /// Split into a frame source and a detector that replays each frame's
    /// detections in order.
    pub fn into_sources(self) -> (ReplayFrames, ReplayDetector) {
        let mut frames = Vec::with_capacity(self.frames.len());
        let mut pending = VecDeque::with_capacity(self.frames.len());
        for recorded in self.frames {
            frames.push(Frame::new(recorded.width, recorded.height, recorded.timestamp));
            pending.push_back(recorded.detections.iter().map(Detection::from).collect());
        }
        (
            ReplayFrames {
                frames: frames.into_iter(),
            },
            ReplayDetector { pending },
        )
    }
}

/// Frames of a [`Recording`], without pixel data.
#[derive(Debug)]
pub struct ReplayFrames {
    frames: std::vec::IntoIter<Frame>,
}

impl FrameSource for ReplayFrames {
    type Error = Infallible;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        Ok(self.frames.next())
    }
}

#[derive(Debug, Error)]
#[error("recording has no detections left to replay")]
pub struct ReplayExhausted;

/// Yields the recorded detections of one frame per call, ignoring the image.
#[derive(Debug)]
pub struct ReplayDetector {
    pending: VecDeque<Vec<Detection>>,
}

impl DetectionSource for ReplayDetector {
    type Error = ReplayExhausted;

    fn detect(
        &mut self,
        _input: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<Detection>, Self::Error> {
        self.pending.pop_front().ok_or(ReplayExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = r#"
# two frames
{"timestamp": 0.0, "width": 640, "height": 480, "detections": [{"class_id": 2, "confidence": 0.9, "bbox": [90, 90, 110, 110]}]}

{"timestamp": 0.5, "width": 640, "height": 480}
"#;

    #[test]
    fn test_parse_recording() {
        let recording = Recording::from_reader(RECORDING.as_bytes()).unwrap();
        assert_eq!(recording.len(), 2);
        assert_eq!(recording.frames()[0].detections[0].class_id, 2);
        assert!(recording.frames()[1].detections.is_empty());
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = Recording::from_reader("\n{\"timestamp\": 0.0}\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Recording { line: 2, .. }));
    }

    #[test]
    fn test_sources_replay_in_order() {
        let recording = Recording::from_reader(RECORDING.as_bytes()).unwrap();
        let (mut frames, mut detector) = recording.into_sources();

        let first = frames.next_frame().unwrap().unwrap();
        assert_eq!(first.timestamp, 0.0);
        let dets = detector.detect(&first.data, first.width, first.height).unwrap();
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].class_id, 2);
        assert_eq!(dets[0].bbox.width, 20.0);

        let second = frames.next_frame().unwrap().unwrap();
        assert_eq!(second.timestamp, 0.5);
        assert!(detector.detect(&[], 640, 480).unwrap().is_empty());

        assert!(frames.next_frame().unwrap().is_none());
        assert!(detector.detect(&[], 640, 480).is_err());
    }
}
