//! Sign rulers for Western astrology.
//!
//! Traditional rulerships only; the seven classical bodies rule all twelve signs.

use crate::ephemeris::Body;
use crate::zodiac::ZodiacSign;

/// Traditional ruler of `sign`
pub fn sign_ruler(sign: ZodiacSign) -> Body {
    const TRADITIONAL_RULERS: [Body; 12] = [
        Body::Mars,    // Aries
        Body::Venus,   // Taurus
        Body::Mercury, // Gemini
        Body::Moon,    // Cancer
        Body::Sun,     // Leo
        Body::Mercury, // Virgo
        Body::Venus,   // Libra
        Body::Mars,    // Scorpio
        Body::Jupiter, // Sagittarius
        Body::Saturn,  // Capricorn
        Body::Saturn,  // Aquarius
        Body::Jupiter, // Pisces
    ];
    TRADITIONAL_RULERS[sign.index()]
}

/// Signs ruled by `body` (one for the lights, two for the others).
pub fn domiciles(body: Body) -> Vec<ZodiacSign> {
    ZodiacSign::ALL
        .iter()
        .copied()
        .filter(|s| sign_ruler(*s) == body)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_ruler_traditional() {
        assert_eq!(sign_ruler(ZodiacSign::Aries), Body::Mars);
        assert_eq!(sign_ruler(ZodiacSign::Cancer), Body::Moon);
        assert_eq!(sign_ruler(ZodiacSign::Leo), Body::Sun);
        assert_eq!(sign_ruler(ZodiacSign::Scorpio), Body::Mars);
        assert_eq!(sign_ruler(ZodiacSign::Aquarius), Body::Saturn);
    }

    #[test]
    fn test_domicile_counts() {
        assert_eq!(domiciles(Body::Sun), vec![ZodiacSign::Leo]);
        assert_eq!(domiciles(Body::Moon), vec![ZodiacSign::Cancer]);
        assert_eq!(
            domiciles(Body::Saturn),
            vec![ZodiacSign::Capricorn, ZodiacSign::Aquarius]
        );
    }
}
