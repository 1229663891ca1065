//! Planetary element tables from JPL "Keplerian Elements for Approximate
//! Positions of the Major Planets" (Standish).
//!
//! Two fits per planet: a short-interval table valid 1800–2050 AD and a
//! long-interval table valid 3000 BC–3000 AD whose outer-planet entries carry
//! extra mean-anomaly terms. Earth is the Earth–Moon barycentre.

use super::kepler::{Element, OrbitalElements, Perturbation};

/// Centuries from J2000 where the short-interval fit applies (inclusive).
pub const SHORT_INTERVAL_MIN_T: f64 = -2.0;
pub const SHORT_INTERVAL_MAX_T: f64 = 0.5;

/// Both element fits for one planet, keyed by its ephemeris key.
#[derive(Debug, Clone, Copy)]
pub struct PlanetElements {
    pub key: &'static str,
    pub short: OrbitalElements,
    pub long: OrbitalElements,
}

/// Pick the fit for `t` centuries from J2000. Hard switch at the boundary.
pub fn select_elements(planet: &PlanetElements, t: f64) -> &OrbitalElements {
    if (SHORT_INTERVAL_MIN_T..=SHORT_INTERVAL_MAX_T).contains(&t) {
        &planet.short
    } else {
        &planet.long
    }
}

/// Look up a planet by ephemeris key.
pub fn planet(key: &str) -> Option<&'static PlanetElements> {
    PLANETS.iter().find(|p| p.key == key)
}

const fn el(
    a: (f64, f64),
    e: (f64, f64),
    i: (f64, f64),
    l: (f64, f64),
    long_peri: (f64, f64),
    long_node: (f64, f64),
    perturbation: Perturbation,
) -> OrbitalElements {
    OrbitalElements {
        a: Element::new(a.0, a.1),
        e: Element::new(e.0, e.1),
        i: Element::new(i.0, i.1),
        l: Element::new(l.0, l.1),
        long_peri: Element::new(long_peri.0, long_peri.1),
        long_node: Element::new(long_node.0, long_node.1),
        perturbation,
    }
}

const NONE: Perturbation = Perturbation::NONE;

pub static PLANETS: [PlanetElements; 9] = [
    PlanetElements {
        key: "mercury",
        short: el(
            (0.38709927, 0.00000037), (0.20563593, 0.00001906), (7.00497902, -0.00594749),
            (252.25032350, 149472.67411175), (77.45779628, 0.16047689), (48.33076593, -0.12534081),
            NONE,
        ),
        long: el(
            (0.38709843, 0.00000000), (0.20563661, 0.00002123), (7.00559432, -0.00590158),
            (252.25166724, 149472.67486623), (77.45771895, 0.15940013), (48.33961819, -0.12214182),
            NONE,
        ),
    },
    PlanetElements {
        key: "venus",
        short: el(
            (0.72333566, 0.00000390), (0.00677672, -0.00004107), (3.39467605, -0.00078890),
            (181.97909950, 58517.81538729), (131.60246718, 0.00268329), (76.67984255, -0.27769418),
            NONE,
        ),
        long: el(
            (0.72332102, -0.00000026), (0.00676399, -0.00005107), (3.39777545, 0.00043494),
            (181.97970850, 58517.81560260), (131.76755713, 0.05679648), (76.67261496, -0.27274174),
            NONE,
        ),
    },
    PlanetElements {
        key: "earth",
        short: el(
            (1.00000261, 0.00000562), (0.01671123, -0.00004392), (-0.00001531, -0.01294668),
            (100.46457166, 35999.37244981), (102.93768193, 0.32327364), (0.0, 0.0),
            NONE,
        ),
        long: el(
            (1.00000018, -0.00000003), (0.01673163, -0.00003661), (-0.00054346, -0.01337178),
            (100.46691572, 35999.37306329), (102.93005885, 0.31795260), (-5.11260389, -0.24123856),
            NONE,
        ),
    },
    PlanetElements {
        key: "mars",
        short: el(
            (1.52371034, 0.00001847), (0.09339410, 0.00007882), (1.84969142, -0.00813131),
            (-4.55343205, 19140.30268499), (-23.94362959, 0.44441088), (49.55953891, -0.29257343),
            NONE,
        ),
        long: el(
            (1.52371243, 0.00000097), (0.09336511, 0.00009149), (1.85181869, -0.00724757),
            (-4.56813164, 19140.29934243), (-23.91744784, 0.45223625), (49.71320984, -0.26852431),
            NONE,
        ),
    },
    PlanetElements {
        key: "jupiter",
        short: el(
            (5.20288700, -0.00011607), (0.04838624, -0.00013253), (1.30439695, -0.00183714),
            (34.39644051, 3034.74612775), (14.72847983, 0.21252668), (100.47390909, 0.20469106),
            NONE,
        ),
        long: el(
            (5.20248019, -0.00002864), (0.04853590, 0.00018026), (1.29861416, -0.00322699),
            (34.33479152, 3034.90371757), (14.27495244, 0.18199196), (100.29282654, 0.13024619),
            Perturbation::new(-0.00012452, 0.06064060, -0.35635438, 38.35125000),
        ),
    },
    PlanetElements {
        key: "saturn",
        short: el(
            (9.53667594, -0.00125060), (0.05386179, -0.00050991), (2.48599187, 0.00193609),
            (49.95424423, 1222.49362201), (92.59887831, -0.41897216), (113.66242448, -0.28867794),
            NONE,
        ),
        long: el(
            (9.54149883, -0.00003065), (0.05550825, -0.00032044), (2.49424102, 0.00451969),
            (50.07571329, 1222.11494724), (92.86136063, 0.54179478), (113.63998702, -0.25015002),
            Perturbation::new(0.00025899, -0.13434469, 0.87320147, 38.35125000),
        ),
    },
    PlanetElements {
        key: "uranus",
        short: el(
            (19.18916464, -0.00196176), (0.04725744, -0.00004397), (0.77263783, -0.00242939),
            (313.23810451, 428.48202785), (170.95427630, 0.40805281), (74.01692503, 0.04240589),
            NONE,
        ),
        long: el(
            (19.18797948, -0.00020455), (0.04685740, -0.00001550), (0.77298127, -0.00180155),
            (314.20276625, 428.49512595), (172.43404441, 0.09266985), (73.96250215, 0.05739699),
            Perturbation::new(0.00058331, -0.97731848, 0.17689245, 7.67025000),
        ),
    },
    PlanetElements {
        key: "neptune",
        short: el(
            (30.06992276, 0.00026291), (0.00859048, 0.00005105), (1.77004347, 0.00035372),
            (-55.12002969, 218.45945325), (44.96476227, -0.32241464), (131.78422574, -0.00508664),
            NONE,
        ),
        long: el(
            (30.06952752, 0.00006447), (0.00895439, 0.00000818), (1.77005520, 0.00022400),
            (304.22289287, 218.46515314), (46.68158724, 0.01009938), (131.78635853, -0.00606302),
            Perturbation::new(-0.00041348, 0.68346318, -0.10162547, 7.67025000),
        ),
    },
    PlanetElements {
        key: "pluto",
        short: el(
            (39.48211675, -0.00031596), (0.24882730, 0.00005170), (17.14001206, 0.00004818),
            (238.92903833, 145.20780515), (224.06891629, -0.04062942), (110.30393684, -0.01183482),
            NONE,
        ),
        long: el(
            (39.48686035, 0.00449751), (0.24885238, 0.00006016), (17.14104260, 0.00000501),
            (238.96535011, 145.18042903), (224.09702598, -0.00968827), (110.30167986, -0.00809981),
            Perturbation::new(-0.01262724, 0.0, 0.0, 0.0),
        ),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_switch_is_hard_at_the_boundary() {
        let jupiter = planet("jupiter").unwrap();
        assert!(std::ptr::eq(select_elements(jupiter, 0.5), &jupiter.short));
        assert!(std::ptr::eq(select_elements(jupiter, -2.0), &jupiter.short));
        assert!(std::ptr::eq(select_elements(jupiter, 0.5000001), &jupiter.long));
        assert!(std::ptr::eq(select_elements(jupiter, -2.0000001), &jupiter.long));
    }

    #[test]
    fn only_long_outer_fits_are_perturbed() {
        for p in PLANETS.iter() {
            assert_eq!(p.short.perturbation, Perturbation::NONE, "{}", p.key);
        }
        assert_eq!(planet("mars").unwrap().long.perturbation, Perturbation::NONE);
        assert_ne!(planet("saturn").unwrap().long.perturbation, Perturbation::NONE);
    }

    #[test]
    fn unknown_key_is_absent() {
        assert!(planet("vulcan").is_none());
    }
}
