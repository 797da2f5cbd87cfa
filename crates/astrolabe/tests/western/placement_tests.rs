use astrolabe::ephemeris::Body;
use astrolabe::western::{BodyPlacement, Dignity};
use astrolabe::zodiac::{longitude_to_sign, Element, ZodiacSign};

#[test]
fn test_sun_at_15_degrees() {
    let sun = BodyPlacement::new(Body::Sun, 15.0, false);
    assert_eq!(sun.sign, ZodiacSign::Aries);
    assert_eq!(sun.element(), Element::Fire);
    assert_eq!(sun.dignity, Dignity::Exaltation);
}

#[test]
fn test_sun_in_leo_direct() {
    let sun = BodyPlacement::new(Body::Sun, 135.0, false);
    assert_eq!(sun.sign, ZodiacSign::Leo);
    assert_eq!(sun.dignity, Dignity::Domicile);
    assert_eq!(sun.score, 5);
}

#[test]
fn test_sign_lookup_is_periodic() {
    for step in 0..720 {
        let lon = step as f64 * 0.5;
        for k in [-3i32, -1, 1, 2, 5] {
            assert_eq!(
                longitude_to_sign(lon),
                longitude_to_sign(lon + 360.0 * k as f64),
                "lon {} k {}",
                lon,
                k
            );
        }
    }
}

#[test]
fn test_placement_normalizes_longitude() {
    let moon = BodyPlacement::new(Body::Moon, -30.0, true);
    assert_eq!(moon.longitude, 330.0);
    assert_eq!(moon.sign, ZodiacSign::Pisces);
    assert!(moon.retrograde);
}
