use std::fmt;

use crate::tracker::{Rect, TrackId};

/// Per-detection output handed to a renderer.
///
/// Carries no color; renderers pick one per `class_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub track_id: TrackId,
    pub class_id: usize,
    /// Class name, or `class {id}` when no name is known
    pub label: String,
    pub score: f32,
    pub bbox: Rect,
    /// Nominal distance from the camera, in "cm"
    pub distance: f32,
    /// Meters per second
    pub speed: f32,
}

impl Annotation {
    /// Baseline of the label text: above the box, or just inside its top
    /// edge when the box touches the top of the frame.
    pub fn label_anchor(&self) -> (f32, f32) {
        let above = self.bbox.y - 10.0;
        let y = if above > 10.0 { above } else { self.bbox.y + 10.0 };
        (self.bbox.x, y)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2} : {:.2}cm : {:.2} m/s",
            self.label, self.score, self.distance, self.speed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(y: f32) -> Annotation {
        Annotation {
            track_id: 4,
            class_id: 0,
            label: "person".to_string(),
            score: 0.876,
            bbox: Rect::new(30.0, y, 50.0, 100.0),
            distance: 213.333,
            speed: 1.5,
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            annotation(100.0).to_string(),
            "person 0.88 : 213.33cm : 1.50 m/s"
        );
    }

    #[test]
    fn test_label_anchor() {
        assert_eq!(annotation(100.0).label_anchor(), (30.0, 90.0));
        assert_eq!(annotation(15.0).label_anchor(), (30.0, 25.0));
        assert_eq!(annotation(20.0).label_anchor(), (30.0, 30.0));
    }
}
