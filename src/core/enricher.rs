use crate::domain::model::{Poi, SearchResultSet};
use crate::domain::ports::KnowledgeSource;
use crate::utils::error::ExploreError;
use futures_util::future::join_all;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub enriched: usize,
    pub missing: usize,
    pub failed: usize,
}

pub struct MetadataEnricher {
    source: Arc<dyn KnowledgeSource>,
}

impl MetadataEnricher {
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        Self { source }
    }

    /// Looks every POI up concurrently and waits for all of them. A failed
    /// lookup leaves that POI's optional fields empty and never fails the set.
    pub async fn enrich(&self, results: &mut SearchResultSet) -> EnrichmentReport {
        let outcomes = join_all(results.iter_mut().map(|poi| self.enrich_one(poi))).await;

        let mut report = EnrichmentReport::default();
        for outcome in outcomes {
            match outcome {
                LookupOutcome::Enriched => report.enriched += 1,
                LookupOutcome::Missing => report.missing += 1,
                LookupOutcome::Failed => report.failed += 1,
            }
        }

        tracing::info!(
            "📚 Enrichment finished: {} enriched, {} without a page, {} failed",
            report.enriched,
            report.missing,
            report.failed
        );
        report
    }

    async fn enrich_one(&self, poi: &mut Poi) -> LookupOutcome {
        match self.source.lookup(&poi.name).await {
            Ok(Some(summary)) if !summary.is_empty() => {
                poi.apply(summary);
                LookupOutcome::Enriched
            }
            Ok(_) => {
                tracing::debug!("No knowledge page for '{}'", poi.name);
                LookupOutcome::Missing
            }
            Err(e) => {
                let e = match e {
                    ExploreError::EnrichmentLookupError { .. } => e,
                    other => ExploreError::EnrichmentLookupError {
                        term: poi.name.clone(),
                        message: other.to_string(),
                    },
                };
                tracing::warn!("⚠️ {}", e);
                LookupOutcome::Failed
            }
        }
    }
}

enum LookupOutcome {
    Enriched,
    Missing,
    Failed,
}
