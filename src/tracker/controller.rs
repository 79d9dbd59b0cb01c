use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::fetch::ElementFetcher;

use super::error::TrackerError;
use super::registry::TrackedObjectRegistry;
use super::types::{TrackedObject, TrackedSummary};

pub type SharedRegistry = Arc<Mutex<TrackedObjectRegistry>>;

pub fn shared_registry() -> SharedRegistry {
    Arc::new(Mutex::new(TrackedObjectRegistry::new()))
}

/// Every registry update is a single insert or remove, so poisoning is ignored.
pub fn lock(registry: &SharedRegistry) -> MutexGuard<'_, TrackedObjectRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Turns add/remove requests into registry mutations.
///
/// `request_add` is two-phase: the duplicate check and the commit each take
/// the lock briefly, and the fetch in between holds nothing. A removal that
/// lands while the fetch is in flight does not cancel it.
pub struct TrackingController<F> {
    registry: SharedRegistry,
    fetcher: F,
}

impl<F: ElementFetcher> TrackingController<F> {
    pub fn new(registry: SharedRegistry, fetcher: F) -> Self {
        Self { registry, fetcher }
    }

    pub async fn request_add(&self, id: &str) -> Result<TrackedSummary, TrackerError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(TrackerError::InvalidIdentifier);
        }

        if lock(&self.registry).contains(id) {
            log::info!("Satellite {} is already being tracked", id);
            return Err(TrackerError::AlreadyTracked(id.to_string()));
        }

        let fetched = self.fetcher.fetch(id).await.map_err(|e| {
            log::warn!("Failed to add satellite {}: {}", id, e);
            TrackerError::FetchFailed(e)
        })?;

        let object = TrackedObject {
            id: id.to_string(),
            display_name: fetched.display_name,
            elements: fetched.elements,
        };
        let summary = object.summary();
        lock(&self.registry).add(object)?;

        log::info!("Tracking {} ({})", summary.name, summary.id);
        Ok(summary)
    }

    /// Always succeeds; returns whether the id was tracked.
    pub fn request_remove(&self, id: &str) -> bool {
        let removed = lock(&self.registry).remove(id.trim());
        if removed {
            log::info!("Stopped tracking {}", id.trim());
        } else {
            log::debug!("Remove for untracked satellite {}", id.trim());
        }
        removed
    }

    pub fn tracked(&self) -> Vec<TrackedSummary> {
        lock(&self.registry)
            .values()
            .map(TrackedObject::summary)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use super::*;
    use crate::fetch::{FetchError, FetchedElements};
    use crate::predict::fixtures::iss;

    /// Serves the ISS elements for known ids, a 404 for everything else.
    #[derive(Default)]
    struct StubFetcher {
        names: HashMap<String, Option<String>>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl StubFetcher {
        fn with(ids: &[(&str, Option<&str>)]) -> Self {
            Self {
                names: ids
                    .iter()
                    .map(|(id, name)| (id.to_string(), name.map(String::from)))
                    .collect(),
                ..Self::default()
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }
    }

    impl ElementFetcher for StubFetcher {
        async fn fetch(&self, id: &str) -> Result<FetchedElements, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.names.get(id) {
                Some(name) => Ok(FetchedElements {
                    display_name: name
                        .clone()
                        .unwrap_or_else(|| crate::fetch::default_display_name(id)),
                    elements: iss(),
                }),
                None => Err(FetchError::Status(404)),
            }
        }
    }

    fn controller(fetcher: StubFetcher) -> TrackingController<StubFetcher> {
        TrackingController::new(shared_registry(), fetcher)
    }

    #[tokio::test]
    async fn add_reports_resolved_name() {
        let ctl = controller(StubFetcher::with(&[
            ("25544", Some("ISS (ZARYA)")),
            ("43013", None),
        ]));

        let iss = ctl.request_add(" 25544 ").await.unwrap();
        let unnamed = ctl.request_add("43013").await.unwrap();

        assert_eq!(iss.name, "ISS (ZARYA)");
        assert_eq!(iss.id, "25544");
        assert_eq!(unnamed.name, "Satellite 43013");
        assert_eq!(
            ctl.tracked().into_iter().map(|s| s.id).collect::<Vec<_>>(),
            ["25544", "43013"]
        );
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected_before_fetch() {
        let ctl = controller(StubFetcher::with(&[("25544", None)]));
        ctl.request_add("25544").await.unwrap();

        let err = ctl.request_add("25544").await.unwrap_err();

        assert!(matches!(err, TrackerError::AlreadyTracked(id) if id == "25544"));
        assert_eq!(ctl.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.tracked().len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_registry_empty() {
        let ctl = controller(StubFetcher::default());

        let err = ctl.request_add("BAD").await.unwrap_err();

        assert!(matches!(err, TrackerError::FetchFailed(FetchError::Status(404))));
        assert_eq!(lock(&ctl.registry).len(), 0);
    }

    #[tokio::test]
    async fn blank_id_never_reaches_fetcher() {
        let ctl = controller(StubFetcher::default());

        assert!(matches!(
            ctl.request_add("   ").await,
            Err(TrackerError::InvalidIdentifier)
        ));
        assert_eq!(ctl.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let ctl = controller(StubFetcher::with(&[("25544", None)]));
        ctl.request_add("25544").await.unwrap();

        assert!(ctl.request_remove("25544"));
        assert!(!ctl.request_remove("25544"));
        assert!(!ctl.request_remove("unknown"));
        assert!(ctl.tracked().is_empty());
    }

    #[tokio::test]
    async fn removal_during_fetch_does_not_cancel_add() {
        let gate = Arc::new(Notify::new());
        let ctl = Arc::new(controller(
            StubFetcher::with(&[("25544", None)]).gated(gate.clone()),
        ));

        let pending = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.request_add("25544").await }
        });
        while ctl.fetcher.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // fetch is suspended; registry does not have the object yet
        assert!(!ctl.request_remove("25544"));
        gate.notify_one();

        pending.await.unwrap().unwrap();
        assert_eq!(ctl.tracked().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_adds_for_different_ids_both_commit() {
        let gate = Arc::new(Notify::new());
        let ctl = Arc::new(controller(
            StubFetcher::with(&[("1", None), ("2", None)]).gated(gate.clone()),
        ));

        let first = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.request_add("1").await }
        });
        let second = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.request_add("2").await }
        });
        while ctl.fetcher.calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        assert!(ctl.tracked().is_empty());

        gate.notify_waiters();
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(ctl.tracked().len(), 2);
    }

    #[tokio::test]
    async fn racing_adds_for_same_id_commit_once() {
        let gate = Arc::new(Notify::new());
        let ctl = Arc::new(controller(
            StubFetcher::with(&[("25544", None)]).gated(gate.clone()),
        ));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let ctl = ctl.clone();
                tokio::spawn(async move { ctl.request_add("25544").await })
            })
            .collect();
        while ctl.fetcher.calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        gate.notify_waiters();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(TrackerError::DuplicateIdentifier(_)))));
        assert_eq!(ctl.tracked().len(), 1);
    }
}
