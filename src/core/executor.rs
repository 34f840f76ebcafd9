use crate::domain::model::{
    CategoryPredicate, Poi, QuerySpec, RawFeature, SearchResultSet, UNNAMED_PLACE,
};
use crate::domain::ports::SpatialSource;
use crate::utils::error::{ExploreError, Result};
use std::fmt::Write;
use std::sync::Arc;

/// Serializes a query into Overpass QL: one statement per predicate per
/// element kind, unioned, with areas reported by their centroid.
pub fn to_overpass_ql(spec: &QuerySpec) -> String {
    let center = spec.center();
    let around = format!(
        "(around:{},{},{})",
        spec.radius_m(),
        center.latitude(),
        center.longitude()
    );

    let mut ql = format!("[out:json][timeout:{}];\n(\n", spec.timeout_secs());
    for predicate in spec.predicates() {
        let filter = tag_filter(predicate);
        for kind in predicate.kinds {
            // writing into a String cannot fail
            let _ = writeln!(ql, "  {}{}{};", kind.as_str(), filter, around);
        }
    }
    ql.push_str(");\nout center;\n");
    ql
}

fn tag_filter(predicate: &CategoryPredicate) -> String {
    match predicate.tag.value {
        Some(value) => format!("[\"{}\"=\"{}\"]", escape(predicate.tag.key), escape(value)),
        None => format!("[\"{}\"]", escape(predicate.tag.key)),
    }
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Turns raw elements into POIs, keeping response order. Elements without a
/// usable position are dropped; overlapping elements are kept as-is.
pub fn normalize(features: Vec<RawFeature>) -> SearchResultSet {
    let total = features.len();
    let pois: Vec<Poi> = features
        .into_iter()
        .filter_map(|feature| {
            let Some(position) = feature.position() else {
                tracing::debug!("Dropping element {} without a usable position", feature.id);
                return None;
            };
            let name = feature.name().unwrap_or(UNNAMED_PLACE).to_string();
            Some(Poi::new(feature.id, name, position))
        })
        .collect();

    if pois.len() < total {
        tracing::debug!(
            "Normalized {} of {} elements ({} dropped)",
            pois.len(),
            total,
            total - pois.len()
        );
    }

    SearchResultSet::new(pois)
}

pub struct SpatialQueryExecutor {
    source: Arc<dyn SpatialSource>,
}

impl SpatialQueryExecutor {
    pub fn new(source: Arc<dyn SpatialSource>) -> Self {
        Self { source }
    }

    pub async fn execute(&self, spec: &QuerySpec) -> Result<SearchResultSet> {
        let ql = to_overpass_ql(spec);
        tracing::debug!(
            "🗺️ Querying {} predicates within {}m of {}",
            spec.predicates().len(),
            spec.radius_m(),
            spec.center()
        );

        let features = self.source.run_query(&ql).await.map_err(|e| match e {
            ExploreError::SpatialQueryError { .. } => e,
            other => ExploreError::SpatialQueryError {
                message: other.to_string(),
            },
        })?;

        tracing::info!("🗺️ Geodata service returned {} elements", features.len());
        Ok(normalize(features))
    }
}
