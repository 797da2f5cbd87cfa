use crate::elemental::contributors::*;
use crate::elemental::types::{BreakdownEntry, ElementDeltas, ElementalProfile};
use crate::ephemeris::Body;

/// Starting percentages before any source is applied.
pub const BASE: ElementDeltas = ElementDeltas {
    fire: 50.0,
    earth: 50.0,
    air: 60.0,
    water: 50.0,
    spirit: 0.0,
};

/// Folds a registry of contributors left to right over [`BASE`].
///
/// Every applied contribution lands in the breakdown, and so does any
/// flooring: spirit after each source that drives it negative, the
/// physical elements once at the end. `BASE` plus the summed breakdown
/// always equals the reported totals.
pub struct ElementalEngine {
    base: ElementDeltas,
    contributors: Vec<Box<dyn Contributor>>,
}

impl Default for ElementalEngine {
    fn default() -> Self {
        Self::new(default_contributors())
    }
}

pub fn default_contributors() -> Vec<Box<dyn Contributor>> {
    vec![
        Box::new(PlacementContributor),
        Box::new(TattvaContributor),
        Box::new(HourContributor),
        Box::new(EnvironmentContributor),
        Box::new(LatitudeContributor),
        Box::new(DiurnalContributor),
        Box::new(SeasonContributor),
        Box::new(WeatherContributor),
        Box::new(EventContributor),
        Box::new(SpiritSeed),
        Box::new(AlignmentSpiritContributor),
        Box::new(AkashaContributor),
        Box::new(EventSpiritContributor),
        Box::new(HourSpiritContributor),
        Box::new(BalanceContributor),
        Box::new(AfflictionContributor),
    ]
}

impl ElementalEngine {
    pub fn new(contributors: Vec<Box<dyn Contributor>>) -> Self {
        Self {
            base: BASE,
            contributors,
        }
    }

    /// Appends a contributor after the existing ones.
    pub fn with_contributor(mut self, contributor: impl Contributor + 'static) -> Self {
        self.contributors.push(Box::new(contributor));
        self
    }

    pub fn base(&self) -> ElementDeltas {
        self.base
    }

    pub fn contributor_names(&self) -> Vec<&'static str> {
        self.contributors.iter().map(|c| c.name()).collect()
    }

    pub fn compute(&self, ctx: &ProfileContext<'_>) -> ElementalProfile {
        let mut running = self.base;
        let mut breakdown = Vec::new();

        for contributor in &self.contributors {
            if let Some(contribution) = contributor.contribute(ctx, &running) {
                log::debug!(
                    "elemental source {}: {:?} ({})",
                    contributor.name(),
                    contribution.deltas,
                    contribution.detail
                );
                running += contribution.deltas;
                breakdown.push(BreakdownEntry {
                    source: contributor.name().to_string(),
                    deltas: contribution.deltas,
                    detail: contribution.detail,
                });

                // spirit never carries a deficit into later sources
                if running.spirit < 0.0 {
                    let lift = ElementDeltas::spirit(-running.spirit);
                    running += lift;
                    breakdown.push(BreakdownEntry {
                        source: "spirit_floor".to_string(),
                        deltas: lift,
                        detail: format!("running spirit raised to zero after {}", contributor.name()),
                    });
                }
            }
        }

        let floor = floor_correction(&running);
        if !floor.is_zero() {
            running += floor;
            breakdown.push(BreakdownEntry {
                source: "floor".to_string(),
                deltas: floor,
                detail: "negative totals raised to zero".to_string(),
            });
        }

        ElementalProfile {
            fire: running.fire,
            earth: running.earth,
            air: running.air,
            water: running.water,
            spirit: running.spirit,
            hour_ruler: ctx.hour.ruler,
            hour_approximate: ctx.hour.approximate,
            tattva: ctx.tattva,
            moon_sign: ctx
                .placements
                .iter()
                .find(|p| p.body == Body::Moon)
                .map(|p| p.sign),
            breakdown,
        }
    }
}

fn floor_correction(totals: &ElementDeltas) -> ElementDeltas {
    let lift = |v: f64| if v < 0.0 { -v } else { 0.0 };
    ElementDeltas {
        fire: lift(totals.fire),
        earth: lift(totals.earth),
        air: lift(totals.air),
        water: lift(totals.water),
        spirit: lift(totals.spirit),
    }
}

/// Profile with the default registry.
pub fn elemental_profile(ctx: &ProfileContext<'_>) -> ElementalProfile {
    ElementalEngine::default().compute(ctx)
}
