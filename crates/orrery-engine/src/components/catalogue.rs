use crate::components::body::{BodyCategory, BodyDesc};

/// Mean Earth–Moon distance in kilometres.
const MOON_ORBIT_KM: f64 = 384_400.0;

/// The static body set: the Sun, the eight planets, Pluto and the Moon.
/// Planets are keyed into the ephemeris by lowercase name.
pub fn solar_system() -> Vec<BodyDesc> {
    vec![
        BodyDesc::new("sun", BodyCategory::Star, 696_000.0)
            .with_rotation_period(609.12)
            .with_label_distance(200.0),
        planet("mercury", 2_439.7, 87.969, 1_407.6, 3.0),
        planet("venus", 6_051.8, 224.701, -5_832.5, 4.0),
        planet("earth", 6_371.0, 365.256, 23.934, 5.0).with_surface(true, true),
        planet("mars", 3_389.5, 686.980, 24.623, 6.0).with_surface(true, false),
        planet("jupiter", 69_911.0, 4_332.59, 9.925, 20.0),
        planet("saturn", 58_232.0, 10_759.22, 10.656, 30.0),
        planet("uranus", 25_362.0, 30_688.5, -17.24, 50.0),
        planet("neptune", 24_622.0, 60_182.0, 16.11, 80.0),
        planet("pluto", 1_188.3, 90_560.0, -153.29, 100.0),
        BodyDesc::new("moon", BodyCategory::Moon, 1_737.4)
            .with_satellite_orbit("earth", MOON_ORBIT_KM, 27.321661, 5.145)
            .with_rotation_period(655.72)
            .with_label_distance(0.05)
            .with_surface(true, false),
    ]
}

fn planet(name: &str, radius_km: f64, period_days: f64, rotation_hours: f64, label_au: f64) -> BodyDesc {
    BodyDesc::new(name, BodyCategory::Planet, radius_km)
        .with_ephemeris(name)
        .with_orbital_period(period_days)
        .with_rotation_period(rotation_hours)
        .with_label_distance(label_au)
}
