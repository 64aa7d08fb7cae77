//! Nearest-centroid identity association.

use crate::error::{Result, ensure_positive};
use crate::tracker::history::{HISTORY_CAPACITY, PositionHistory, Sample};
use crate::tracker::matching::{self, Detection};
use crate::tracker::track::{Track, TrackId};
use log::{debug, trace};
use nalgebra::Point2;

/// How detections of one frame may share a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssociationPolicy {
    /// Every detection independently takes its nearest track, so several
    /// detections of one frame can land on the same track.
    #[default]
    Shared,
    /// Tracks and detections are paired one-to-one by minimum total distance.
    Exclusive,
}

/// Configuration for the CentroidTracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Largest centroid distance, in pixels, that still reuses a track
    pub match_distance: f32,
    /// Drop tracks unmatched for more than this many frames; `None` keeps them forever
    pub max_idle_frames: Option<u32>,
    pub policy: AssociationPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            match_distance: 50.0,
            max_idle_frames: None,
            policy: AssociationPolicy::Shared,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("match_distance", self.match_distance as f64)
    }
}

/// Outcome of associating one detection.
#[derive(Debug, Clone)]
pub struct Association<const N: usize = HISTORY_CAPACITY> {
    pub detection: Detection,
    pub track_id: TrackId,
    /// The detection started a new track
    pub is_new: bool,
    /// Track history right after this detection was appended
    pub history: PositionHistory<N>,
}

/// Owns the track table and assigns track ids to detections frame by frame.
///
/// `N` is the number of samples kept per track.
pub struct CentroidTracker<const N: usize = HISTORY_CAPACITY> {
    tracks: Vec<Track<N>>,
    next_id: TrackId,
    frame_id: u64,
    config: TrackerConfig,
}

impl<const N: usize> CentroidTracker<N> {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 0,
            frame_id: 0,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Tracks in creation order.
    pub fn tracks(&self) -> &[Track<N>] {
        &self.tracks
    }

    pub fn track(&self, track_id: TrackId) -> Option<&Track<N>> {
        self.index_of(track_id).map(|idx| &self.tracks[idx])
    }

    /// Number of ids handed out, including tracks already evicted.
    pub fn tracks_created(&self) -> u64 {
        self.next_id
    }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_id
    }

    /// Associate one frame of detections observed at `timestamp` (seconds).
    ///
    /// Returns one association per detection, in input order. Matching only
    /// considers the track positions committed before this call.
    pub fn update(&mut self, detections: Vec<Detection>, timestamp: f64) -> Vec<Association<N>> {
        self.frame_id += 1;

        // Step 1: Snapshot committed positions
        let (candidates, points): (Vec<usize>, Vec<Point2<f32>>) = self
            .tracks
            .iter()
            .enumerate()
            .filter_map(|(idx, t)| t.last_sample().map(|s| (idx, s.position)))
            .unzip();

        let centroids: Vec<Point2<f32>> = detections.iter().map(Detection::centroid).collect();
        let dists = matching::centroid_distance(&points, &centroids);

        // Step 2: Pick a track for every detection
        let matched: Vec<Option<usize>> = match self.config.policy {
            AssociationPolicy::Shared => matching::nearest_tracks(&dists)
                .into_iter()
                .map(|nearest| {
                    nearest
                        .filter(|&(_, d)| d <= self.config.match_distance)
                        .map(|(row, _)| candidates[row])
                })
                .collect(),
            AssociationPolicy::Exclusive => {
                let matches = matching::linear_assignment(&dists, self.config.match_distance);
                let mut matched = vec![None; detections.len()];
                for (row, col) in matches {
                    matched[col] = Some(candidates[row]);
                }
                matched
            }
        };

        // Step 3: Append observations, creating tracks as needed
        let mut associations = Vec::with_capacity(detections.len());
        for ((detection, centroid), target) in detections.into_iter().zip(centroids).zip(matched) {
            let (idx, is_new) = match target {
                Some(idx) => {
                    trace!(
                        "detection at ({:.1}, {:.1}) matched track {}",
                        centroid.x, centroid.y, self.tracks[idx].track_id
                    );
                    (idx, false)
                }
                None => (self.start_track(centroid), true),
            };

            let track = &mut self.tracks[idx];
            track.update(Sample::new(centroid, timestamp), self.frame_id);
            associations.push(Association {
                detection,
                track_id: track.track_id,
                is_new,
                history: track.history,
            });
        }

        // Step 4: Evict idle tracks
        if let Some(max_idle) = self.config.max_idle_frames {
            let frame_id = self.frame_id;
            self.tracks.retain(|t| {
                let keep = t.idle_frames(frame_id) <= max_idle as u64;
                if !keep {
                    debug!("evicting track {} idle since frame {}", t.track_id, t.end_frame());
                }
                keep
            });
        }

        associations
    }

    fn start_track(&mut self, centroid: Point2<f32>) -> usize {
        let track_id = self.next_id;
        self.next_id += 1;
        debug!(
            "new track {} at ({:.1}, {:.1}) in frame {}",
            track_id, centroid.x, centroid.y, self.frame_id
        );
        self.tracks.push(Track::new(track_id, self.frame_id));
        self.tracks.len() - 1
    }

    fn index_of(&self, track_id: TrackId) -> Option<usize> {
        // ids are pushed in increasing order and retain keeps that order
        self.tracks
            .binary_search_by_key(&track_id, |t| t.track_id)
            .ok()
    }
}

impl<const N: usize> Default for CentroidTracker<N> {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
