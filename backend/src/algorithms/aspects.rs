//! Orb-based aspect matching.

use qtty::Degrees;

use crate::models::{Aspect, AspectKind, BodyId, ALL_ASPECT_KINDS};

pub const BASE_ORB: f64 = 8.0;
pub const PRIMARY_LUMINARY_ORB: f64 = 10.0;
pub const SECONDARY_LUMINARY_ORB: f64 = 12.0;

/// Smallest angle between two longitudes, in `[0, 180]`.
pub fn angular_separation(a: Degrees, b: Degrees) -> Degrees {
    a.abs_separation(b)
}

/// Orb allowed for an aspect between two bodies.
///
/// The widest applicable rule wins: the Moon widens to 12°, the Sun to 10°,
/// everything else gets the base 8°.
pub fn orb_for(a: BodyId, b: BodyId) -> Degrees {
    let orb = if a.is_secondary_luminary() || b.is_secondary_luminary() {
        SECONDARY_LUMINARY_ORB
    } else if a.is_primary_luminary() || b.is_primary_luminary() {
        PRIMARY_LUMINARY_ORB
    } else {
        BASE_ORB
    };
    Degrees::new(orb)
}

/// Whether `separation` lies within `orb` of any canonical aspect angle.
pub fn is_within_orb(separation: Degrees, orb: Degrees) -> bool {
    ALL_ASPECT_KINDS
        .iter()
        .any(|kind| (separation.value() - kind.angle()).abs() <= orb.value())
}

pub fn is_significant(separation: Degrees, a: BodyId, b: BodyId) -> bool {
    is_within_orb(separation, orb_for(a, b))
}

/// The closest canonical aspect between a transiting and a natal position, if any.
pub fn find_aspect(
    transiting: BodyId,
    transiting_lon: Degrees,
    natal: BodyId,
    natal_lon: Degrees,
) -> Option<Aspect> {
    let separation = angular_separation(transiting_lon, natal_lon);
    let orb = orb_for(transiting, natal).value();

    ALL_ASPECT_KINDS
        .iter()
        .map(|kind| (*kind, (separation.value() - kind.angle()).abs()))
        .filter(|(_, deviation)| *deviation <= orb)
        .min_by(|x, y| x.1.total_cmp(&y.1))
        .map(|(kind, deviation)| Aspect {
            kind,
            angle: separation,
            deviation: Degrees::new(deviation),
            body_a: transiting,
            body_b: natal,
            nature: kind.nature(),
        })
}

/// How close an aspect is to exact, `1.0` at zero deviation and `0.0` at the orb edge.
pub fn exactness(aspect: &Aspect) -> f64 {
    let orb = orb_for(aspect.body_a, aspect.body_b).value();
    (1.0 - aspect.deviation.value() / orb).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn deg(v: f64) -> Degrees {
        Degrees::new(v)
    }

    #[test]
    fn test_separation_wraps_at_360() {
        assert!((angular_separation(deg(350.0), deg(10.0)).value() - 20.0).abs() < 1e-9);
        assert!((angular_separation(deg(0.0), deg(180.0)).value() - 180.0).abs() < 1e-9);
        assert!((angular_separation(deg(90.0), deg(300.0)).value() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_orbs_by_body_pair() {
        assert_eq!(orb_for(BodyId::Mars, BodyId::Saturn).value(), 8.0);
        assert_eq!(orb_for(BodyId::Sun, BodyId::Saturn).value(), 10.0);
        assert_eq!(orb_for(BodyId::Venus, BodyId::Moon).value(), 12.0);
        assert_eq!(orb_for(BodyId::Sun, BodyId::Moon).value(), 12.0);
    }

    #[test]
    fn test_significance_thresholds() {
        // 9 degrees off a conjunction: only luminaries reach it
        assert!(!is_significant(deg(9.0), BodyId::Mars, BodyId::Venus));
        assert!(is_significant(deg(9.0), BodyId::Sun, BodyId::Venus));
        assert!(is_significant(deg(128.0), BodyId::Mars, BodyId::Venus));
        assert!(!is_significant(deg(150.0), BodyId::Mars, BodyId::Venus));
        assert!(!is_significant(deg(150.0), BodyId::Moon, BodyId::Venus));
    }

    #[test]
    fn test_find_aspect_picks_closest() {
        let aspect = find_aspect(BodyId::Jupiter, deg(10.5), BodyId::Sun, deg(10.0)).unwrap();
        assert_eq!(aspect.kind, AspectKind::Conjunction);
        assert!((aspect.deviation.value() - 0.5).abs() < 1e-9);
        assert_eq!(aspect.body_a, BodyId::Jupiter);
        assert_eq!(aspect.body_b, BodyId::Sun);

        let aspect = find_aspect(BodyId::Moon, deg(70.0), BodyId::Mars, deg(0.0)).unwrap();
        assert_eq!(aspect.kind, AspectKind::Sextile);
        assert_eq!(aspect.nature, crate::models::AspectNature::Beneficial);

        assert!(find_aspect(BodyId::Mars, deg(40.0), BodyId::Venus, deg(0.0)).is_none());
    }

    #[test]
    fn test_exactness() {
        let exact = find_aspect(BodyId::Saturn, deg(90.0), BodyId::Mars, deg(0.0)).unwrap();
        assert_eq!(exactness(&exact), 1.0);
        let loose = find_aspect(BodyId::Saturn, deg(94.0), BodyId::Mars, deg(0.0)).unwrap();
        assert!((exactness(&loose) - 0.5).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_separation_symmetric_and_bounded(a in 0.0f64..360.0, b in 0.0f64..360.0) {
            let ab = angular_separation(deg(a), deg(b)).value();
            let ba = angular_separation(deg(b), deg(a)).value();
            prop_assert!((ab - ba).abs() < 1e-9);
            prop_assert!((0.0..=180.0).contains(&ab));
        }

        #[test]
        fn prop_widening_orb_never_loses_a_match(
            sep in 0.0f64..=180.0,
            narrow in 0.0f64..15.0,
            extra in 0.0f64..15.0,
        ) {
            if is_within_orb(deg(sep), deg(narrow)) {
                prop_assert!(is_within_orb(deg(sep), deg(narrow + extra)));
            }
        }
    }
}
