mod elements;
mod error;
mod geodetic;
mod propagation;
mod types;

pub use elements::{parse_multi_tle, ElementSet};
pub use error::PredictError;
pub use geodetic::{GeodeticProjector, EARTH_RADIUS_KM};
pub use propagation::{Propagator, Sgp4Propagator};
pub use types::{GeographicPosition, Geodetic, PositionVector};

#[cfg(test)]
pub(crate) use elements::tests as fixtures;
