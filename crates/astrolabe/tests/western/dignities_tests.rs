use astrolabe::ephemeris::Body;
use astrolabe::western::dignities::*;
use astrolabe::western::domiciles;
use astrolabe::zodiac::ZodiacSign;

#[test]
fn test_every_body_and_sign_is_classified_within_bounds() {
    for body in Body::ALL {
        for sign in ZodiacSign::ALL {
            for retrograde in [false, true] {
                let result = dignity_of(body, sign, retrograde);
                assert!(
                    (MIN_SCORE..=MAX_SCORE).contains(&result.score),
                    "{} in {} scored {}",
                    body,
                    sign,
                    result.score
                );
                assert_eq!(result.dignity, classify(body, sign));
            }
        }
    }
}

#[test]
fn test_each_body_has_one_sign_per_category() {
    for body in Body::ALL {
        let count = |d: Dignity| ZodiacSign::ALL.iter().filter(|s| classify(body, **s) == d).count();
        let domicile_count = domiciles(body).len();
        assert_eq!(count(Dignity::Domicile), domicile_count, "{}", body);
        assert_eq!(count(Dignity::Detriment), domicile_count, "{}", body);
        assert_eq!(count(Dignity::Exaltation), 1, "{}", body);
        assert_eq!(count(Dignity::Fall), 1, "{}", body);
    }
}

#[test]
fn test_dignity_is_idempotent() {
    for body in Body::ALL {
        for sign in ZodiacSign::ALL {
            assert_eq!(dignity_of(body, sign, true), dignity_of(body, sign, true));
        }
    }
}

#[test]
fn test_retrograde_penalty() {
    let direct = dignity_of(Body::Mars, ZodiacSign::Aries, false);
    let retro = dignity_of(Body::Mars, ZodiacSign::Aries, true);
    assert_eq!(direct.score, 5);
    assert_eq!(retro.score, 3);
    assert_eq!(retro.dignity, Dignity::Domicile);

    let fallen = dignity_of(Body::Saturn, ZodiacSign::Aries, true);
    assert_eq!(fallen.dignity, Dignity::Fall);
    assert_eq!(fallen.score, -6);
}

#[test]
fn test_mercury_table() {
    assert_eq!(classify(Body::Mercury, ZodiacSign::Gemini), Dignity::Domicile);
    assert_eq!(classify(Body::Mercury, ZodiacSign::Virgo), Dignity::Domicile);
    assert_eq!(classify(Body::Mercury, ZodiacSign::Aquarius), Dignity::Exaltation);
    assert_eq!(classify(Body::Mercury, ZodiacSign::Sagittarius), Dignity::Detriment);
    assert_eq!(classify(Body::Mercury, ZodiacSign::Pisces), Dignity::Detriment);
    assert_eq!(classify(Body::Mercury, ZodiacSign::Leo), Dignity::Fall);
}
