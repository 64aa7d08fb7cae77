//! Distance and speed estimates derived from a box width and a track history.
//!
//! Both estimates are heuristics meant for display. They never fail:
//! degenerate inputs produce zero speed or a bounded distance.

use crate::error::{Result, ensure_positive};
use crate::tracker::history::PositionHistory;

/// Constants of the distance and speed heuristics.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicsConfig {
    /// Empirical scale `K` in `frame_width * K / (box_width + offset)`
    pub distance_scale: f32,
    /// Offset added to the box width so narrow boxes stay finite
    pub distance_offset: f32,
    /// Meters represented by one pixel of centroid motion
    pub pixel_to_meter: f32,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            distance_scale: 20.0,
            distance_offset: 10.0,
            pixel_to_meter: 0.05,
        }
    }
}

impl KinematicsConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("distance_scale", self.distance_scale as f64)?;
        ensure_positive("distance_offset", self.distance_offset as f64)?;
        ensure_positive("pixel_to_meter", self.pixel_to_meter as f64)
    }

    /// Nominal distance from the camera, in "cm".
    #[inline]
    pub fn distance(&self, box_width: f32, frame_width: u32) -> f32 {
        estimate_distance(box_width, frame_width, self.distance_scale, self.distance_offset)
    }

    /// Speed in meters per second over the last two samples of `history`.
    #[inline]
    pub fn speed<const N: usize>(&self, history: &PositionHistory<N>) -> f32 {
        estimate_speed(history, self.pixel_to_meter)
    }
}

/// Inverse-proportion distance heuristic: wider boxes are closer.
///
/// Negative widths are treated as zero, which bounds the result by
/// `frame_width * scale / offset`.
pub fn estimate_distance(box_width: f32, frame_width: u32, scale: f32, offset: f32) -> f32 {
    (frame_width as f32 * scale) / (box_width.max(0.0) + offset)
}

/// Speed between the second-most-recent and the most recent sample.
///
/// Returns 0 when fewer than two samples exist or when the elapsed time is
/// not strictly positive.
pub fn estimate_speed<const N: usize>(history: &PositionHistory<N>, pixel_to_meter: f32) -> f32 {
    let (Some(new), Some(old)) = (history.latest(), history.previous()) else {
        return 0.0;
    };

    let elapsed = new.timestamp - old.timestamp;
    if elapsed.is_nan() || elapsed <= 0.0 {
        return 0.0;
    }

    let pixels = nalgebra::distance(&old.position, &new.position);
    let meters = pixels as f64 * pixel_to_meter as f64;
    (meters / elapsed) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::history::Sample;
    use nalgebra::Point2;

    fn history(samples: &[((f32, f32), f64)]) -> PositionHistory {
        let mut history = PositionHistory::new();
        for &((x, y), t) in samples {
            history.push(Sample::new(Point2::new(x, y), t));
        }
        history
    }

    #[test]
    fn test_distance_reference_values() {
        let config = KinematicsConfig::default();
        assert!((config.distance(50.0, 640) - 640.0 * 20.0 / 60.0).abs() < 1e-3);
        assert!((config.distance(100.0, 640) - 640.0 * 20.0 / 110.0).abs() < 1e-3);
    }

    #[test]
    fn test_distance_decreases_with_width() {
        let config = KinematicsConfig::default();
        let mut last = f32::INFINITY;
        for width in (0..600).step_by(25) {
            let d = config.distance(width as f32, 640);
            assert!(d < last);
            last = d;
        }
    }

    #[test]
    fn test_distance_is_bounded_for_degenerate_boxes() {
        let config = KinematicsConfig::default();
        assert_eq!(config.distance(0.0, 640), 1280.0);
        assert_eq!(config.distance(-10.0, 640), 1280.0);
        assert!(config.distance(-500.0, 640).is_finite());
    }

    #[test]
    fn test_speed_needs_two_samples() {
        let config = KinematicsConfig::default();
        assert_eq!(config.speed(&PositionHistory::<2>::new()), 0.0);
        assert_eq!(config.speed(&history(&[((100.0, 100.0), 1.0)])), 0.0);
    }

    #[test]
    fn test_speed_zero_for_equal_timestamps() {
        let config = KinematicsConfig::default();
        let h = history(&[((0.0, 0.0), 5.0), ((300.0, 400.0), 5.0)]);
        assert_eq!(config.speed(&h), 0.0);
    }

    #[test]
    fn test_speed_zero_for_out_of_order_timestamps() {
        let config = KinematicsConfig::default();
        let h = history(&[((0.0, 0.0), 5.0), ((30.0, 40.0), 4.0)]);
        assert_eq!(config.speed(&h), 0.0);
    }

    #[test]
    fn test_speed_value() {
        // 50 px over 0.5 s at 0.05 m/px
        let config = KinematicsConfig::default();
        let h = history(&[((0.0, 0.0), 1.0), ((30.0, 40.0), 1.5)]);
        assert!((config.speed(&h) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_speed_uses_two_latest_samples() {
        let config = KinematicsConfig::default();
        let mut h: PositionHistory<3> = PositionHistory::new();
        h.push(Sample::new(Point2::new(1000.0, 1000.0), 0.0));
        h.push(Sample::new(Point2::new(0.0, 0.0), 1.0));
        h.push(Sample::new(Point2::new(20.0, 0.0), 2.0));
        assert!((config.speed(&h) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_validate() {
        assert!(KinematicsConfig::default().validate().is_ok());

        let config = KinematicsConfig {
            distance_offset: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
