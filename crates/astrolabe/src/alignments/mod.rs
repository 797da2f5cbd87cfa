pub mod detector;
pub mod types;

pub use detector::{angular_separation, AlignmentDetector};
pub use types::{Alignment, AlignmentKind, AlignmentSettings};

use crate::western::BodyPlacement;

/// Default-orb detection over `placements`.
pub fn detect_alignments(placements: &[BodyPlacement]) -> Vec<Alignment> {
    AlignmentDetector::new().detect(placements)
}
