//! Matching utilities for centroid association.

use crate::tracker::rect::Rect;
use nalgebra::Point2;
use ndarray::Array2;

/// Cost given to padding cells and gated-out pairs before solving an assignment.
const INFEASIBLE_COST: f64 = 1e6;

/// Detection input for the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Bounding box in pixel space
    pub bbox: Rect,
    /// Detection confidence score
    pub score: f32,
    /// Detector class index
    pub class_id: usize,
}

impl Detection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, score: f32) -> Self {
        Self {
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
            score,
            class_id: 0,
        }
    }

    pub fn from_rect(bbox: Rect, score: f32) -> Self {
        Self {
            bbox,
            score,
            class_id: 0,
        }
    }

    pub fn with_class(mut self, class_id: usize) -> Self {
        self.class_id = class_id;
        self
    }

    #[inline]
    pub fn centroid(&self) -> Point2<f32> {
        self.bbox.centroid()
    }
}

/// Compute the Euclidean distance matrix between track positions (rows) and
/// detection centroids (columns).
pub fn centroid_distance(track_points: &[Point2<f32>], det_points: &[Point2<f32>]) -> Array2<f32> {
    let mut dists = Array2::zeros((track_points.len(), det_points.len()));
    for (i, t) in track_points.iter().enumerate() {
        for (j, d) in det_points.iter().enumerate() {
            dists[[i, j]] = nalgebra::distance(t, d);
        }
    }
    dists
}

/// For every detection column, the closest track row and its distance.
///
/// Ties resolve to the lowest row index. Columns are `None` when there are
/// no rows or no distance compares below infinity.
pub fn nearest_tracks(dists: &Array2<f32>) -> Vec<Option<(usize, f32)>> {
    dists
        .columns()
        .into_iter()
        .map(|column| {
            let mut best: Option<(usize, f32)> = None;
            let mut min_distance = f32::INFINITY;
            for (row, &d) in column.iter().enumerate() {
                if d < min_distance {
                    min_distance = d;
                    best = Some((row, d));
                }
            }
            best
        })
        .collect()
}

/// One-to-one assignment minimising total cost, as `(row, column)` pairs.
/// Pairs costing more than `thresh` are never matched.
pub fn linear_assignment(cost_matrix: &Array2<f32>, thresh: f32) -> Vec<(usize, usize)> {
    let (num_rows, num_cols) = cost_matrix.dim();
    if num_rows == 0 || num_cols == 0 {
        return vec![];
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), INFEASIBLE_COST);

    for ((i, j), &cost) in cost_matrix.indexed_iter() {
        if cost <= thresh {
            padded[[i, j]] = cost as f64;
        }
    }

    match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => row_to_col
            .into_iter()
            .enumerate()
            .filter(|&(row, col)| {
                row < num_rows && col < num_cols && cost_matrix[[row, col]] <= thresh
            })
            .collect(),
        Err(_) => {
            log::warn!("linear assignment failed, leaving all pairs unmatched");
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_detection_centroid() {
        let det = Detection::new(90.0, 90.0, 110.0, 110.0, 0.8).with_class(2);
        assert_eq!(det.centroid(), Point2::new(100.0, 100.0));
        assert_eq!(det.class_id, 2);
    }

    #[test]
    fn test_centroid_distance_shape_and_values() {
        let tracks = [Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
        let dets = [Point2::new(3.0, 4.0)];
        let dists = centroid_distance(&tracks, &dets);

        assert_eq!(dists.dim(), (2, 1));
        assert!((dists[[0, 0]] - 5.0).abs() < 1e-6);
        assert!((dists[[1, 0]] - 65.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_nearest_tracks_prefers_first_on_tie() {
        let dists = array![[5.0_f32, 9.0], [5.0, 1.0]];
        let nearest = nearest_tracks(&dists);
        assert_eq!(nearest, vec![Some((0, 5.0)), Some((1, 1.0))]);
    }

    #[test]
    fn test_nearest_tracks_without_tracks() {
        let dists = Array2::<f32>::zeros((0, 3));
        assert_eq!(nearest_tracks(&dists), vec![None, None, None]);
    }

    #[test]
    fn test_linear_assignment_is_one_to_one() {
        // both detections are closest to track 0, total cost decides
        let dists = array![[1.0_f32, 2.0], [30.0, 40.0]];
        let mut matches = linear_assignment(&dists, 50.0);

        matches.sort();
        assert_eq!(matches, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_linear_assignment_respects_threshold() {
        let dists = array![[1.0_f32, 2.0], [300.0, 400.0]];
        assert_eq!(linear_assignment(&dists, 50.0), vec![(0, 0)]);
    }

    #[test]
    fn test_linear_assignment_empty_inputs() {
        let no_tracks = Array2::<f32>::zeros((0, 2));
        assert!(linear_assignment(&no_tracks, 50.0).is_empty());

        let no_dets = Array2::<f32>::zeros((2, 0));
        assert!(linear_assignment(&no_dets, 50.0).is_empty());
    }
}
