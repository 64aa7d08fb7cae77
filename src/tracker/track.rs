//! A single tracked object.

use crate::tracker::history::{HISTORY_CAPACITY, PositionHistory, Sample};

/// Opaque identity of a track. Allocated in increasing order from zero by
/// the tracker that owns the track and never reused.
pub type TrackId = u64;

#[derive(Debug, Clone)]
pub struct Track<const N: usize = HISTORY_CAPACITY> {
    /// Unique track identifier
    pub track_id: TrackId,
    /// Recent (centroid, timestamp) observations, newest last
    pub history: PositionHistory<N>,
    /// Index of the frame that created the track
    pub start_frame: u64,
    /// Index of the last frame in which a detection was associated
    pub frame_id: u64,
    /// Number of detections associated over the track's lifetime
    pub hits: u64,
}

impl<const N: usize> Track<N> {
    /// Create a track with an empty history.
    pub fn new(track_id: TrackId, frame_id: u64) -> Self {
        Self {
            track_id,
            history: PositionHistory::new(),
            start_frame: frame_id,
            frame_id,
            hits: 0,
        }
    }

    /// Record an associated observation.
    pub fn update(&mut self, sample: Sample, frame_id: u64) {
        self.history.push(sample);
        self.frame_id = frame_id;
        self.hits += 1;
    }

    /// Latest observation, `None` until the first update.
    #[inline]
    pub fn last_sample(&self) -> Option<&Sample> {
        self.history.latest()
    }

    pub fn end_frame(&self) -> u64 {
        self.frame_id
    }

    /// Frames elapsed since the track was last matched.
    #[inline]
    pub fn idle_frames(&self, current_frame: u64) -> u64 {
        current_frame.saturating_sub(self.frame_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    #[test]
    fn test_new_track_is_empty() {
        let track: Track = Track::new(7, 3);
        assert_eq!(track.track_id, 7);
        assert_eq!(track.start_frame, 3);
        assert_eq!(track.hits, 0);
        assert!(track.last_sample().is_none());
    }

    #[test]
    fn test_update_appends_and_counts() {
        let mut track: Track = Track::new(0, 1);
        track.update(Sample::new(Point2::new(1.0, 1.0), 0.1), 1);
        track.update(Sample::new(Point2::new(2.0, 2.0), 0.2), 2);
        track.update(Sample::new(Point2::new(3.0, 3.0), 0.3), 4);

        assert_eq!(track.hits, 3);
        assert_eq!(track.end_frame(), 4);
        assert_eq!(track.history.len(), 2);
        assert_eq!(track.last_sample().unwrap().position, Point2::new(3.0, 3.0));
        assert_eq!(track.idle_frames(6), 2);
    }
}
