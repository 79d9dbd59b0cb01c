use serde::Serialize;
use utoipa::ToSchema;

/// Inertial (TEME) position in kilometres, as produced by SGP4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionVector(pub [f64; 3]);

impl PositionVector {
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

/// Where a tracked object sits over the Earth at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GeographicPosition {
    pub id: String,
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Height above the ellipsoid divided by the reference radius.
    pub altitude_fraction: f64,
}

/// Earth-fixed coordinates of a single propagated vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_fraction: f64,
}
