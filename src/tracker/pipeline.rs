use chrono::{DateTime, Utc};

use crate::predict::{GeodeticProjector, GeographicPosition, Propagator, Sgp4Propagator};

use super::registry::TrackedObjectRegistry;
use super::types::TrackedObject;

/// Propagate-then-project over every tracked object for one instant.
#[derive(Debug, Clone, Default)]
pub struct PositionPipeline<P = Sgp4Propagator> {
    propagator: P,
    projector: GeodeticProjector,
}

impl<P: Propagator> PositionPipeline<P> {
    pub fn new(propagator: P, projector: GeodeticProjector) -> Self {
        Self {
            propagator,
            projector,
        }
    }

    /// Objects without a resolvable position are left out entirely.
    pub fn compute_positions(
        &self,
        registry: &TrackedObjectRegistry,
        time: DateTime<Utc>,
    ) -> Vec<GeographicPosition> {
        registry
            .values()
            .filter_map(|object| self.position_of(object, time))
            .collect()
    }

    fn position_of(
        &self,
        object: &TrackedObject,
        time: DateTime<Utc>,
    ) -> Option<GeographicPosition> {
        let vector = self.propagator.propagate(&object.elements, time)?;
        let geo = self.projector.project(vector, time);

        Some(GeographicPosition {
            id: object.id.clone(),
            name: object.display_name.clone(),
            latitude_deg: geo.latitude_deg,
            longitude_deg: geo.longitude_deg,
            altitude_fraction: geo.altitude_fraction,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::predict::{ElementSet, PositionVector};
    use crate::tracker::registry::tests::object;

    /// Fixed vector for everything except ids listed as decayed.
    struct StubPropagator {
        decayed: Vec<String>,
    }

    impl Propagator for StubPropagator {
        fn propagate(&self, elements: &ElementSet, _time: DateTime<Utc>) -> Option<PositionVector> {
            // the stub keys on the name carried by the element set
            let name = elements.elements().object_name.as_deref().unwrap_or_default();
            if self.decayed.iter().any(|d| d == name) {
                None
            } else {
                Some(PositionVector([7000.0, 0.0, 0.0]))
            }
        }
    }

    fn named(id: &str) -> TrackedObject {
        let mut obj = object(id);
        obj.elements = ElementSet::from_lines(
            Some(id.to_string()),
            crate::predict::fixtures::ISS_LINE1,
            crate::predict::fixtures::ISS_LINE2,
        )
        .unwrap();
        obj
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 7, 13, 0, 0, 0).unwrap()
    }

    #[test]
    fn drops_objects_without_position() {
        let mut registry = TrackedObjectRegistry::new();
        for id in ["a", "X", "b"] {
            registry.add(named(id)).unwrap();
        }
        let pipeline = PositionPipeline::new(
            StubPropagator {
                decayed: vec!["X".into()],
            },
            GeodeticProjector::default(),
        );

        let positions = pipeline.compute_positions(&registry, t0());
        let ids: Vec<_> = positions.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn empty_registry_yields_nothing() {
        let pipeline = PositionPipeline::<Sgp4Propagator>::default();

        assert!(pipeline
            .compute_positions(&TrackedObjectRegistry::new(), t0())
            .is_empty());
    }

    #[test]
    fn iss_moves_between_ticks() {
        let mut registry = TrackedObjectRegistry::new();
        registry.add(object("25544")).unwrap();
        let pipeline = PositionPipeline::<Sgp4Propagator>::default();

        let first = pipeline.compute_positions(&registry, t0());
        let second = pipeline.compute_positions(&registry, t0() + Duration::seconds(3));

        assert_eq!(first.len(), 1);
        let p = &first[0];
        assert_eq!(p.id, "25544");
        assert!((-90.0..=90.0).contains(&p.latitude_deg));
        assert!((-180.0..=180.0).contains(&p.longitude_deg));
        // ISS flies roughly 400 km up
        assert!((0.04..0.08).contains(&p.altitude_fraction), "{}", p.altitude_fraction);

        assert_eq!(second.len(), 1);
        assert_ne!(first[0], second[0]);
    }

    #[test]
    fn recomputation_is_stable() {
        let mut registry = TrackedObjectRegistry::new();
        registry.add(object("25544")).unwrap();
        let pipeline = PositionPipeline::<Sgp4Propagator>::default();

        assert_eq!(
            pipeline.compute_positions(&registry, t0()),
            pipeline.compute_positions(&registry, t0())
        );
    }
}
