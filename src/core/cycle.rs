use crate::domain::model::{Coordinate, CycleToken, SearchPhase, SearchResultSet};
use crate::domain::ports::ResultSink;
use std::sync::{Arc, Mutex, MutexGuard};

struct SharedState {
    latest: CycleToken,
    center: Option<Coordinate>,
    current: SearchResultSet,
}

/// Owns the "latest cycle" token and the committed result set. A cycle's
/// output reaches the sink only while its token is still the latest one.
///
/// Sink callbacks run with `state` unlocked, so a sink may read back
/// through the pipeline. `delivery` keeps callbacks in commit order.
pub struct SearchCoordinator {
    state: Mutex<SharedState>,
    delivery: Mutex<()>,
    sink: Arc<dyn ResultSink>,
}

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // state stays consistent even if a sink panicked mid-publish
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SearchCoordinator {
    pub fn new(sink: Arc<dyn ResultSink>) -> Self {
        Self {
            state: Mutex::new(SharedState {
                latest: CycleToken(0),
                center: None,
                current: SearchResultSet::empty(),
            }),
            delivery: Mutex::new(()),
            sink,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        relock(&self.state)
    }

    /// Issues a new token; every older cycle becomes stale.
    pub fn begin_cycle(&self) -> CycleToken {
        let mut state = self.lock();
        state.latest = CycleToken(state.latest.0 + 1);
        tracing::debug!("Search cycle {} started", state.latest);
        state.latest
    }

    pub fn latest(&self) -> CycleToken {
        self.lock().latest
    }

    pub fn is_current(&self, token: CycleToken) -> bool {
        self.lock().latest == token
    }

    /// Reports a phase change for `token` if it is still current.
    pub fn report_phase(&self, token: CycleToken, phase: SearchPhase) -> bool {
        let _delivery = relock(&self.delivery);
        if !self.is_current(token) {
            return false;
        }
        tracing::debug!("Search cycle {} is {}", token, phase);
        self.sink.phase_changed(token, phase);
        true
    }

    /// Applies `results` as the current set. Returns `false`, leaving state
    /// untouched, when a newer cycle has been issued since `token`.
    pub fn commit(
        &self,
        token: CycleToken,
        center: Option<Coordinate>,
        results: SearchResultSet,
    ) -> bool {
        let _delivery = relock(&self.delivery);
        {
            let mut state = self.lock();
            if state.latest != token {
                tracing::debug!(
                    "Discarding {} results of stale cycle {} (latest is {})",
                    results.len(),
                    token,
                    state.latest
                );
                return false;
            }
            state.center = center;
            state.current = results.clone();
        }
        self.sink.publish(token, center, &results);
        true
    }

    pub fn current_results(&self) -> SearchResultSet {
        self.lock().current.clone()
    }

    pub fn current_center(&self) -> Option<Coordinate> {
        self.lock().center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sink::MemorySink;
    use crate::domain::model::Poi;
    use std::sync::OnceLock;

    fn one_poi(name: &str) -> SearchResultSet {
        SearchResultSet::new(vec![Poi::new(1, name, Coordinate::new(0.0, 0.0).unwrap())])
    }

    #[test]
    fn test_tokens_increase_monotonically() {
        let coordinator = SearchCoordinator::new(Arc::new(MemorySink::new()));

        let a = coordinator.begin_cycle();
        let b = coordinator.begin_cycle();

        assert!(b > a);
        assert_eq!(coordinator.latest(), b);
        assert!(!coordinator.is_current(a));
    }

    #[test]
    fn test_stale_commit_is_discarded() {
        let sink = Arc::new(MemorySink::new());
        let coordinator = SearchCoordinator::new(sink.clone());

        let a = coordinator.begin_cycle();
        let b = coordinator.begin_cycle();

        assert!(coordinator.commit(b, None, one_poi("Newer")));
        assert!(!coordinator.commit(a, None, one_poi("Older")));

        assert_eq!(coordinator.current_results().iter().next().unwrap().name, "Newer");
        assert_eq!(sink.publish_count(), 1);
        assert_eq!(sink.last_token(), Some(b));
    }

    #[test]
    fn test_stale_phases_are_not_reported() {
        let sink = Arc::new(MemorySink::new());
        let coordinator = SearchCoordinator::new(sink.clone());

        let a = coordinator.begin_cycle();
        assert!(coordinator.report_phase(a, SearchPhase::Resolving));
        let _b = coordinator.begin_cycle();
        assert!(!coordinator.report_phase(a, SearchPhase::Querying));

        assert_eq!(sink.phases(), vec![(a, SearchPhase::Resolving)]);
    }

    /// Reads coordinator state from inside its own callbacks.
    #[derive(Default)]
    struct ReadBackSink {
        coordinator: OnceLock<Arc<SearchCoordinator>>,
        seen: Mutex<Vec<(CycleToken, Option<Coordinate>, usize)>>,
    }

    impl ResultSink for ReadBackSink {
        fn publish(&self, token: CycleToken, _center: Option<Coordinate>, _results: &SearchResultSet) {
            if let Some(coordinator) = self.coordinator.get() {
                let seen = (
                    coordinator.latest(),
                    coordinator.current_center(),
                    coordinator.current_results().len(),
                );
                assert_eq!(seen.0, token);
                self.seen.lock().unwrap().push(seen);
            }
        }

        fn phase_changed(&self, token: CycleToken, _phase: SearchPhase) {
            if let Some(coordinator) = self.coordinator.get() {
                assert!(coordinator.is_current(token));
            }
        }
    }

    #[test]
    fn test_sink_can_read_state_from_its_callbacks() {
        let sink = Arc::new(ReadBackSink::default());
        let coordinator = Arc::new(SearchCoordinator::new(sink.clone()));
        let _ = sink.coordinator.set(coordinator.clone());
        let center = Coordinate::new(38.7, -9.1).unwrap();

        let token = coordinator.begin_cycle();
        assert!(coordinator.report_phase(token, SearchPhase::Resolving));
        assert!(coordinator.commit(token, Some(center), one_poi("Castle")));

        assert_eq!(*sink.seen.lock().unwrap(), vec![(token, Some(center), 1)]);
        assert_eq!(coordinator.current_center(), Some(center));
    }
}
