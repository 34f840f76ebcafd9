use crate::core::cycle::SearchCoordinator;
use crate::core::enricher::MetadataEnricher;
use crate::core::executor::SpatialQueryExecutor;
use crate::core::query_builder::QueryBuilder;
use crate::core::resolver::CoordinateResolver;
use crate::domain::model::{Coordinate, CycleToken, LocationIntent, SearchPhase, SearchResultSet};
use crate::domain::ports::{Geocoder, KnowledgeSource, LocationProvider, ResultSink, SpatialSource};
use crate::utils::error::{ErrorKind, Result};
use std::sync::Arc;

/// How one search cycle ended.
///
/// A superseded cycle (`applied == false`) carries an empty `results`; its
/// `phase` is the last one it reached before it stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub token: CycleToken,
    pub phase: SearchPhase,
    pub failure: Option<ErrorKind>,
    /// Where the search was centered, once the location resolved.
    pub center: Option<Coordinate>,
    pub results: SearchResultSet,
    /// `false` when a newer cycle superseded this one before it finished.
    pub applied: bool,
}

/// What `run_cycle` got to before returning.
enum CycleEnd {
    Finished(SearchResultSet),
    Superseded(SearchPhase),
}

/// Resolve → query → enrich, one cycle per search intent.
pub struct SearchPipeline {
    resolver: CoordinateResolver,
    builder: QueryBuilder,
    executor: SpatialQueryExecutor,
    enricher: MetadataEnricher,
    coordinator: SearchCoordinator,
}

impl SearchPipeline {
    pub fn new(
        location: Arc<dyn LocationProvider>,
        geocoder: Arc<dyn Geocoder>,
        spatial: Arc<dyn SpatialSource>,
        knowledge: Arc<dyn KnowledgeSource>,
        sink: Arc<dyn ResultSink>,
        builder: QueryBuilder,
    ) -> Self {
        Self {
            resolver: CoordinateResolver::new(location, geocoder),
            builder,
            executor: SpatialQueryExecutor::new(spatial),
            enricher: MetadataEnricher::new(knowledge),
            coordinator: SearchCoordinator::new(sink),
        }
    }

    /// Runs a full cycle. Failures degrade to an empty result set; only the
    /// latest cycle's output is committed to the sink.
    pub async fn search(&self, intent: LocationIntent) -> CycleOutcome {
        let token = self.coordinator.begin_cycle();
        tracing::info!("🔎 Search {} started for {:?}", token, intent);
        self.coordinator.report_phase(token, SearchPhase::Idle);

        let mut center = None;
        let (phase, failure, results) = match self.run_cycle(token, &intent, &mut center).await {
            Ok(CycleEnd::Finished(results)) => (SearchPhase::Ready, None, results),
            Ok(CycleEnd::Superseded(reached)) => {
                tracing::info!("Search {} was superseded while {}", token, reached);
                return CycleOutcome {
                    token,
                    phase: reached,
                    failure: None,
                    center,
                    results: SearchResultSet::empty(),
                    applied: false,
                };
            }
            Err(e) => {
                tracing::warn!("❌ Search {} failed: {}", token, e);
                tracing::debug!("💡 {}", e.recovery_suggestion());
                (SearchPhase::Failed, Some(e.kind()), SearchResultSet::empty())
            }
        };

        self.coordinator.report_phase(token, phase);
        let applied = self.coordinator.commit(token, center, results.clone());
        if applied {
            tracing::info!("✅ Search {} {} with {} places", token, phase, results.len());
        } else {
            tracing::info!("Search {} was superseded; its results were discarded", token);
        }

        CycleOutcome {
            token,
            phase,
            failure,
            center,
            results: if applied { results } else { SearchResultSet::empty() },
            applied,
        }
    }

    async fn run_cycle(
        &self,
        token: CycleToken,
        intent: &LocationIntent,
        center: &mut Option<Coordinate>,
    ) -> Result<CycleEnd> {
        self.coordinator.report_phase(token, SearchPhase::Resolving);
        let resolved = self.resolver.resolve(intent).await?;
        *center = Some(resolved);

        self.coordinator.report_phase(token, SearchPhase::Querying);
        let spec = self.builder.build(resolved);
        let mut results = self.executor.execute(&spec).await?;

        // a superseded cycle has nothing left to show for the lookups
        if !self.coordinator.is_current(token) {
            return Ok(CycleEnd::Superseded(SearchPhase::Querying));
        }

        self.coordinator.report_phase(token, SearchPhase::Enriching);
        self.enricher.enrich(&mut results).await;
        Ok(CycleEnd::Finished(results))
    }

    pub fn latest_token(&self) -> CycleToken {
        self.coordinator.latest()
    }

    pub fn current_results(&self) -> SearchResultSet {
        self.coordinator.current_results()
    }

    /// Center of the latest committed cycle.
    pub fn current_center(&self) -> Option<Coordinate> {
        self.coordinator.current_center()
    }
}
