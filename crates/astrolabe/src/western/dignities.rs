//! Essential dignities for Western astrology.
//!
//! Classifies a body in a sign as Domicile, Exaltation, Detriment, Fall or
//! Neutral and scores it, with a flat retrograde penalty. Scores are always
//! clamped to [`MIN_SCORE`, `MAX_SCORE`].

use crate::ephemeris::Body;
use crate::western::rulers::sign_ruler;
use crate::zodiac::ZodiacSign;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SCORE: i32 = -10;
pub const MAX_SCORE: i32 = 10;
pub const RETROGRADE_PENALTY: i32 = -2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dignity {
    Domicile,
    Exaltation,
    Detriment,
    Fall,
    Neutral,
}

impl Dignity {
    pub fn base_score(&self) -> i32 {
        match self {
            Dignity::Domicile => 5,
            Dignity::Exaltation => 4,
            Dignity::Detriment => -5,
            Dignity::Fall => -4,
            Dignity::Neutral => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dignity::Domicile => "Domicile",
            Dignity::Exaltation => "Exaltation",
            Dignity::Detriment => "Detriment",
            Dignity::Fall => "Fall",
            Dignity::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Dignity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DignityResult {
    #[serde(rename = "type")]
    pub dignity: Dignity,
    pub score: i32,
}

/// Exaltation sign per body.
pub fn exaltation(body: Body) -> ZodiacSign {
    match body {
        Body::Sun => ZodiacSign::Aries,
        Body::Moon => ZodiacSign::Taurus,
        Body::Mercury => ZodiacSign::Aquarius,
        Body::Venus => ZodiacSign::Pisces,
        Body::Mars => ZodiacSign::Capricorn,
        Body::Jupiter => ZodiacSign::Cancer,
        Body::Saturn => ZodiacSign::Libra,
    }
}

/// Fall is the sign opposite the exaltation.
pub fn fall(body: Body) -> ZodiacSign {
    opposite(exaltation(body))
}

fn opposite(sign: ZodiacSign) -> ZodiacSign {
    ZodiacSign::from_index(sign.index() + 6)
}

/// Classify `body` in `sign`. The four categories are disjoint per body, so
/// at most one of them matches.
pub fn classify(body: Body, sign: ZodiacSign) -> Dignity {
    if sign_ruler(sign) == body {
        Dignity::Domicile
    } else if exaltation(body) == sign {
        Dignity::Exaltation
    } else if sign_ruler(opposite(sign)) == body {
        Dignity::Detriment
    } else if fall(body) == sign {
        Dignity::Fall
    } else {
        Dignity::Neutral
    }
}

/// Classification and clamped score for `body` in `sign`.
pub fn dignity_of(body: Body, sign: ZodiacSign, is_retrograde: bool) -> DignityResult {
    let dignity = classify(body, sign);
    let mut score = dignity.base_score();
    if is_retrograde {
        score += RETROGRADE_PENALTY;
    }
    DignityResult {
        dignity,
        score: score.clamp(MIN_SCORE, MAX_SCORE),
    }
}
