use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Name given to places whose tags carry no `name`.
pub const UNNAMED_PLACE: &str = "Unnamed place";

/// Only built through [`Coordinate::new`], so the WGS84 ranges always hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting anything outside the WGS84 ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        crate::utils::validation::validate_range("latitude", latitude, -90.0, 90.0)?;
        crate::utils::validation::validate_range("longitude", longitude, -180.0, 180.0)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// What the user asked to search around.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationIntent {
    DeviceLocation,
    City(String),
}

/// OSM element kinds a predicate can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

pub const POINT_ONLY: &[ElementKind] = &[ElementKind::Node];
pub const POINT_AND_AREA: &[ElementKind] = &[ElementKind::Node, ElementKind::Way];
pub const ALL_GEOMETRIES: &[ElementKind] =
    &[ElementKind::Node, ElementKind::Way, ElementKind::Relation];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Historic,
    Attraction,
    Nature,
    Eatery,
}

/// `key` alone matches any value; `key=value` matches exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagFilter {
    pub key: &'static str,
    pub value: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPredicate {
    pub category: Category,
    pub tag: TagFilter,
    pub kinds: &'static [ElementKind],
}

/// One spatial search, built once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    center: Coordinate,
    radius_m: u32,
    timeout_secs: u32,
    predicates: Vec<CategoryPredicate>,
}

impl QuerySpec {
    pub fn new(
        center: Coordinate,
        radius_m: u32,
        timeout_secs: u32,
        predicates: Vec<CategoryPredicate>,
    ) -> Self {
        Self {
            center,
            radius_m,
            timeout_secs,
            predicates,
        }
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn radius_m(&self) -> u32 {
        self.radius_m
    }

    pub fn timeout_secs(&self) -> u32 {
        self.timeout_secs
    }

    pub fn predicates(&self) -> &[CategoryPredicate] {
        &self.predicates
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

/// One element of a geodata response, as the service sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawFeature {
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: Option<ElementKind>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<Centroid>,
}

impl RawFeature {
    /// Direct coordinates first, then the server-computed centroid.
    pub fn position(&self) -> Option<Coordinate> {
        let (lat, lon) = match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => (lat, lon),
            (_, _, Some(center)) => (center.lat, center.lon),
            _ => return None,
        };
        Coordinate::new(lat, lon).ok()
    }

    pub fn name(&self) -> Option<&str> {
        self.tags
            .get("name")
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Poi {
    pub id: u64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_link: Option<String>,
}

impl Poi {
    pub fn new(id: u64, name: impl Into<String>, position: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            latitude: position.latitude(),
            longitude: position.longitude(),
            description: None,
            image_url: None,
            reference_link: None,
        }
    }

    pub fn position(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.description.is_some() || self.image_url.is_some() || self.reference_link.is_some()
    }

    pub fn apply(&mut self, summary: PageSummary) {
        self.description = summary.description;
        self.image_url = summary.image_url;
        self.reference_link = summary.reference_link;
    }
}

/// What the knowledge service knows about a search term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSummary {
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub reference_link: Option<String>,
}

impl PageSummary {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.image_url.is_none() && self.reference_link.is_none()
    }
}

/// POIs in discovery order, owned by one search cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchResultSet {
    pois: Vec<Poi>,
}

impl SearchResultSet {
    pub fn new(pois: Vec<Poi>) -> Self {
        Self { pois }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Poi> {
        self.pois.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Poi> {
        self.pois.iter_mut()
    }

    /// Looks up the POI a user selected in the list or on the map.
    pub fn get(&self, id: u64) -> Option<&Poi> {
        self.pois.iter().find(|poi| poi.id == id)
    }

    pub fn into_pois(self) -> Vec<Poi> {
        self.pois
    }
}

impl<'a> IntoIterator for &'a SearchResultSet {
    type Item = &'a Poi;
    type IntoIter = std::slice::Iter<'a, Poi>;

    fn into_iter(self) -> Self::IntoIter {
        self.pois.iter()
    }
}

/// Monotonically increasing id of a search cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CycleToken(pub u64);

impl fmt::Display for CycleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    Resolving,
    Querying,
    Enriching,
    Ready,
    Failed,
}

impl SearchPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Querying => "querying",
            Self::Enriching => "enriching",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}
