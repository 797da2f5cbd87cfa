//! Per-body Western placement results.

use crate::ephemeris::Body;
use crate::western::dignities::{dignity_of, Dignity};
use crate::zodiac::{degree_in_sign, longitude_to_sign, normalize_degrees, Element, ZodiacSign};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPlacement {
    pub body: Body,
    pub sign: ZodiacSign,
    pub dignity: Dignity,
    /// Clamped to [-10, 10]
    pub score: i32,
    #[serde(rename = "isRetrograde")]
    pub retrograde: bool,
    /// Degrees in [0, 360); the sign is derived from it
    pub longitude: f64,
}

impl BodyPlacement {
    pub fn new(body: Body, longitude: f64, retrograde: bool) -> Self {
        let longitude = normalize_degrees(longitude);
        let sign = longitude_to_sign(longitude);
        let result = dignity_of(body, sign, retrograde);
        Self {
            body,
            sign,
            dignity: result.dignity,
            score: result.score,
            retrograde,
            longitude,
        }
    }

    pub fn element(&self) -> Element {
        self.sign.element()
    }

    /// Degrees past the start of the sign, in [0, 30)
    pub fn degree(&self) -> f64 {
        degree_in_sign(self.longitude)
    }
}
