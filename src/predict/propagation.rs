use chrono::{DateTime, Utc};

use crate::predict::elements::ElementSet;
use crate::predict::types::PositionVector;

/// Orbit prediction capability: elements + time to inertial position.
///
/// `None` means the model cannot place the object at that time (decayed,
/// out of the model's domain). Implementations must be pure.
pub trait Propagator {
    fn propagate(&self, elements: &ElementSet, time: DateTime<Utc>) -> Option<PositionVector>;
}

/// SGP4/SDP4 via the `sgp4` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn propagate(&self, elements: &ElementSet, time: DateTime<Utc>) -> Option<PositionVector> {
        let minutes = match elements
            .elements()
            .datetime_to_minutes_since_epoch(&time.naive_utc())
        {
            Ok(m) => m,
            Err(_) => {
                log::trace!("norad {}: {} out of range", elements.norad_id(), time);
                return None;
            }
        };

        match elements.constants().propagate(minutes) {
            Ok(prediction) => {
                let position = PositionVector(prediction.position);
                position.is_finite().then_some(position)
            }
            Err(e) => {
                log::trace!("norad {}: no position: {}", elements.norad_id(), e);
                None
            }
        }
    }
}
