use crate::alignments::types::{Alignment, AlignmentKind, AlignmentSettings};
use crate::ephemeris::Body;
use crate::western::BodyPlacement;
use crate::zodiac::{normalize_degrees, ZodiacSign};
use std::collections::BTreeMap;

/// Smaller of the two arcs between two longitudes, in [0, 180].
pub fn angular_separation(lon1: f64, lon2: f64) -> f64 {
    let raw_diff = normalize_degrees(lon1 - lon2);
    if raw_diff > 180.0 {
        360.0 - raw_diff
    } else {
        raw_diff
    }
}

fn strength_within_orb(deviation: f64, orb: f64) -> u32 {
    (100.0 * (1.0 - deviation / orb)).round().clamp(0.0, 100.0) as u32
}

fn body_list(bodies: &[Body]) -> String {
    bodies.iter().map(|b| b.name()).collect::<Vec<_>>().join(", ")
}

/// Runs the conjunction, opposition, linear and stellium passes.
#[derive(Debug, Clone, Default)]
pub struct AlignmentDetector {
    settings: AlignmentSettings,
}

impl AlignmentDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: AlignmentSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AlignmentSettings {
        &self.settings
    }

    /// All four passes, concatenated without deduplication.
    pub fn detect(&self, placements: &[BodyPlacement]) -> Vec<Alignment> {
        let mut out = self.detect_pairs(placements);
        out.extend(self.detect_linear(placements));
        out.extend(self.detect_stelliums(placements));
        out
    }

    /// Conjunctions then oppositions over every unordered pair.
    pub fn detect_pairs(&self, placements: &[BodyPlacement]) -> Vec<Alignment> {
        let mut conjunctions = Vec::new();
        let mut oppositions = Vec::new();

        for i in 0..placements.len() {
            for j in (i + 1)..placements.len() {
                let a = &placements[i];
                let b = &placements[j];
                let sep = angular_separation(a.longitude, b.longitude);

                if sep <= self.settings.conjunction_orb {
                    conjunctions.push(Alignment {
                        bodies: vec![a.body, b.body],
                        kind: AlignmentKind::Conjunction,
                        description: format!(
                            "{} conjunct {} ({:.1}° apart)",
                            a.body, b.body, sep
                        ),
                        strength: strength_within_orb(sep, self.settings.conjunction_orb),
                    });
                }

                let from_opposition = (sep - 180.0).abs();
                if from_opposition <= self.settings.opposition_orb {
                    oppositions.push(Alignment {
                        bodies: vec![a.body, b.body],
                        kind: AlignmentKind::Opposition,
                        description: format!(
                            "{} opposite {} ({:.1}° from exact)",
                            a.body, b.body, from_opposition
                        ),
                        strength: strength_within_orb(
                            from_opposition,
                            self.settings.opposition_orb,
                        ),
                    });
                }
            }
        }

        conjunctions.extend(oppositions);
        conjunctions
    }

    /// Flags a triple when any two of its three consecutive gaps (sorted
    /// longitudes, wraparound gap included) differ by no more than the
    /// tolerance.
    ///
    /// This is a loose heuristic, not a collinearity test: evenly spread
    /// triples qualify as readily as genuinely lined-up ones, and false
    /// positives are expected.
    pub fn detect_linear(&self, placements: &[BodyPlacement]) -> Vec<Alignment> {
        let tol = self.settings.linear_gap_tolerance;
        let mut out = Vec::new();
        let n = placements.len();

        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    let mut lons = [
                        placements[i].longitude,
                        placements[j].longitude,
                        placements[k].longitude,
                    ];
                    lons.sort_by(|a, b| a.total_cmp(b));
                    let gaps = [
                        lons[1] - lons[0],
                        lons[2] - lons[1],
                        360.0 - lons[2] + lons[0],
                    ];
                    let near_equal = (gaps[0] - gaps[1]).abs() <= tol
                        || (gaps[1] - gaps[2]).abs() <= tol
                        || (gaps[0] - gaps[2]).abs() <= tol;

                    if near_equal {
                        let bodies = vec![placements[i].body, placements[j].body, placements[k].body];
                        out.push(Alignment {
                            description: format!(
                                "{} in approximate linear pattern (gaps {:.0}°/{:.0}°/{:.0}°)",
                                body_list(&bodies),
                                gaps[0],
                                gaps[1],
                                gaps[2]
                            ),
                            bodies,
                            kind: AlignmentKind::Linear,
                            strength: self.settings.linear_strength,
                        });
                    }
                }
            }
        }
        out
    }

    /// One stellium per sign holding enough bodies.
    pub fn detect_stelliums(&self, placements: &[BodyPlacement]) -> Vec<Alignment> {
        let mut by_sign: BTreeMap<ZodiacSign, Vec<Body>> = BTreeMap::new();
        for p in placements {
            by_sign.entry(p.sign).or_default().push(p.body);
        }

        by_sign
            .into_iter()
            .filter(|(_, bodies)| bodies.len() >= self.settings.stellium_min_bodies)
            .map(|(sign, bodies)| Alignment {
                description: format!(
                    "Stellium in {} {}: {}",
                    sign.glyph(),
                    sign,
                    body_list(&bodies)
                ),
                strength: bodies.len() as u32 * self.settings.stellium_strength_per_body,
                bodies,
                kind: AlignmentKind::Stellium,
            })
            .collect()
    }
}
