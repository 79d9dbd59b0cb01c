use chrono::{DateTime, Utc};

use crate::predict::types::{Geodetic, PositionVector};

// WGS-84
const SEMI_MAJOR_AXIS_KM: f64 = 6378.137;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const ECCENTRICITY_SQ: f64 = FLATTENING * (2.0 - FLATTENING);

pub const EARTH_RADIUS_KM: f64 = 6371.0;

const MAX_ITERATIONS: usize = 20;
const LATITUDE_TOLERANCE_RAD: f64 = 1e-12;

/// Converts TEME vectors to latitude, longitude and normalised altitude.
#[derive(Debug, Clone, Copy)]
pub struct GeodeticProjector {
    reference_radius_km: f64,
}

impl Default for GeodeticProjector {
    fn default() -> Self {
        Self {
            reference_radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl GeodeticProjector {
    pub fn new(reference_radius_km: f64) -> Self {
        Self {
            reference_radius_km,
        }
    }

    pub fn project(&self, position: PositionVector, time: DateTime<Utc>) -> Geodetic {
        let gmst = greenwich_sidereal_time(time);
        let ecef = teme_to_ecef_position(position.0, gmst);
        let (lat, lon, height_km) = ecef_to_geodetic(ecef);

        Geodetic {
            latitude_deg: lat.to_degrees(),
            longitude_deg: lon.to_degrees(),
            altitude_fraction: height_km / self.reference_radius_km,
        }
    }
}

/// Greenwich mean sidereal time in radians.
pub fn greenwich_sidereal_time(time: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()))
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let (sin_gmst, cos_gmst) = gmst.sin_cos();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// Returns `(latitude_rad, longitude_rad, height_km)`, longitude in [-pi, pi].
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = ecef;
    let longitude = y.atan2(x);
    let p = (x * x + y * y).sqrt();

    let mut latitude = z.atan2(p * (1.0 - ECCENTRICITY_SQ));
    let mut n = SEMI_MAJOR_AXIS_KM;
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = latitude.sin();
        n = SEMI_MAJOR_AXIS_KM / (1.0 - ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
        let next = (z + n * ECCENTRICITY_SQ * sin_lat).atan2(p);
        let converged = (next - latitude).abs() < LATITUDE_TOLERANCE_RAD;
        latitude = next;
        if converged {
            break;
        }
    }

    let (sin_lat, cos_lat) = latitude.sin_cos();
    // Near the poles p / cos(lat) degenerates; use the z form instead.
    let height = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        z.abs() / sin_lat.abs() - n * (1.0 - ECCENTRICITY_SQ)
    };

    (latitude, longitude, height)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 7, 13, 0, 0, 0).unwrap()
    }

    #[test]
    fn equatorial_point_on_surface() {
        let (lat, lon, h) = ecef_to_geodetic([SEMI_MAJOR_AXIS_KM, 0.0, 0.0]);
        assert!(lat.abs() < 1e-9);
        assert!(lon.abs() < 1e-9);
        assert!(h.abs() < 1e-6);
    }

    #[test]
    fn polar_axis_is_total() {
        let (lat, _, h) = ecef_to_geodetic([0.0, 0.0, 7000.0]);
        let polar_radius = SEMI_MAJOR_AXIS_KM * (1.0 - FLATTENING);

        assert!((lat.to_degrees() - 90.0).abs() < 1e-9);
        assert!((h - (7000.0 - polar_radius)).abs() < 1e-6, "height {h}");

        let (lat, _, _) = ecef_to_geodetic([0.0, 0.0, -7000.0]);
        assert!((lat.to_degrees() + 90.0).abs() < 1e-9);
    }

    #[test]
    fn teme_rotation_preserves_norm_and_z() {
        let v = [4000.0, -3000.0, 2500.0];
        let r = teme_to_ecef_position(v, 1.234);
        let norm = |a: [f64; 3]| (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt();

        assert!((norm(v) - norm(r)).abs() < 1e-9);
        assert_eq!(r[2], v[2]);
    }

    #[test]
    fn longitude_follows_earth_rotation() {
        let projector = GeodeticProjector::default();
        let geo = projector.project(PositionVector([7000.0, 0.0, 0.0]), time());
        let expected = (-greenwich_sidereal_time(time()).to_degrees() + 180.0)
            .rem_euclid(360.0)
            - 180.0;

        assert!((geo.longitude_deg - expected).abs() < 1e-6);
        assert!(geo.latitude_deg.abs() < 1e-9);
    }

    #[test]
    fn altitude_is_fraction_of_reference_radius() {
        let v = PositionVector([SEMI_MAJOR_AXIS_KM + 400.0, 0.0, 0.0]);
        let earth = GeodeticProjector::default().project(v, time());
        let doubled = GeodeticProjector::new(2.0 * EARTH_RADIUS_KM).project(v, time());

        assert!((earth.altitude_fraction - 400.0 / EARTH_RADIUS_KM).abs() < 1e-9);
        assert!((earth.altitude_fraction - 2.0 * doubled.altitude_fraction).abs() < 1e-12);
    }

    #[test]
    fn projection_is_deterministic_and_in_range() {
        let projector = GeodeticProjector::default();
        let v = PositionVector([-2100.5, 5800.25, -3300.0]);
        let a = projector.project(v, time());
        let b = projector.project(v, time());

        assert_eq!(a, b);
        assert!((-90.0..=90.0).contains(&a.latitude_deg));
        assert!((-180.0..=180.0).contains(&a.longitude_deg));
    }
}
