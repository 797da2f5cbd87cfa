use crate::ephemeris::Body;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentKind {
    Conjunction,
    Opposition,
    /// Heuristic three-body pattern, see [`crate::alignments::AlignmentDetector::detect_linear`]
    Linear,
    Stellium,
}

impl AlignmentKind {
    pub fn name(&self) -> &'static str {
        match self {
            AlignmentKind::Conjunction => "Conjunction",
            AlignmentKind::Opposition => "Opposition",
            AlignmentKind::Linear => "Linear",
            AlignmentKind::Stellium => "Stellium",
        }
    }
}

/// A geometric relationship among two or more bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub bodies: Vec<Body>,
    #[serde(rename = "type")]
    pub kind: AlignmentKind,
    pub description: String,
    /// Percentage; only stelliums may exceed 100
    pub strength: u32,
}

/// Orb settings for the alignment passes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSettings {
    pub conjunction_orb: f64,
    pub opposition_orb: f64,
    /// Largest allowed difference between two of the three gaps of a triple
    pub linear_gap_tolerance: f64,
    pub linear_strength: u32,
    pub stellium_min_bodies: usize,
    pub stellium_strength_per_body: u32,
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            conjunction_orb: 8.0,
            opposition_orb: 8.0,
            linear_gap_tolerance: 15.0,
            linear_strength: 75,
            stellium_min_bodies: 3,
            stellium_strength_per_body: 15,
        }
    }
}
