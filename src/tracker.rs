mod centroid_tracker;
mod history;
pub mod kinematics;
mod matching;
mod rect;
mod track;

pub use centroid_tracker::{Association, AssociationPolicy, CentroidTracker, TrackerConfig};
pub use history::{HISTORY_CAPACITY, PositionHistory, Sample};
pub use kinematics::KinematicsConfig;
pub use matching::Detection;
pub use rect::Rect;
pub use track::{Track, TrackId};
