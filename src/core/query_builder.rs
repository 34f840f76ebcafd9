use crate::domain::model::{
    Category, CategoryPredicate, Coordinate, ElementKind, QuerySpec, TagFilter, ALL_GEOMETRIES,
    POINT_AND_AREA, POINT_ONLY,
};
use crate::domain::ports::ConfigProvider;

pub const DEFAULT_RADIUS_M: u32 = 3000;
pub const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 25;

const fn predicate(
    category: Category,
    key: &'static str,
    value: Option<&'static str>,
    kinds: &'static [ElementKind],
) -> CategoryPredicate {
    CategoryPredicate {
        category,
        tag: TagFilter { key, value },
        kinds,
    }
}

/// Every kind of place a search looks for, in the order results are requested.
pub const CATALOG: &[CategoryPredicate] = &[
    predicate(Category::Historic, "historic", None, ALL_GEOMETRIES),
    predicate(Category::Attraction, "tourism", Some("museum"), POINT_AND_AREA),
    predicate(Category::Attraction, "tourism", Some("gallery"), POINT_AND_AREA),
    predicate(Category::Attraction, "tourism", Some("zoo"), POINT_AND_AREA),
    predicate(Category::Attraction, "tourism", Some("theme_park"), POINT_AND_AREA),
    predicate(Category::Attraction, "tourism", Some("attraction"), POINT_AND_AREA),
    predicate(Category::Nature, "leisure", Some("park"), ALL_GEOMETRIES),
    predicate(Category::Nature, "leisure", Some("garden"), POINT_AND_AREA),
    predicate(Category::Nature, "leisure", Some("nature_reserve"), POINT_AND_AREA),
    predicate(Category::Eatery, "amenity", Some("restaurant"), POINT_ONLY),
    predicate(Category::Eatery, "amenity", Some("cafe"), POINT_ONLY),
    predicate(Category::Eatery, "amenity", Some("pub"), POINT_ONLY),
    predicate(Category::Eatery, "amenity", Some("bar"), POINT_ONLY),
];

/// Builds the single composite query for a search around `center`.
pub fn build_query(center: Coordinate, radius_m: u32) -> QuerySpec {
    QueryBuilder::new(radius_m, DEFAULT_QUERY_TIMEOUT_SECS).build(center)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBuilder {
    radius_m: u32,
    timeout_secs: u32,
}

impl QueryBuilder {
    pub fn new(radius_m: u32, timeout_secs: u32) -> Self {
        Self {
            radius_m,
            timeout_secs,
        }
    }

    pub fn from_config(config: &dyn ConfigProvider) -> Self {
        Self::new(config.search_radius_m(), config.query_timeout_secs())
    }

    pub fn radius_m(&self) -> u32 {
        self.radius_m
    }

    pub fn build(&self, center: Coordinate) -> QuerySpec {
        QuerySpec::new(center, self.radius_m, self.timeout_secs, CATALOG.to_vec())
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS_M, DEFAULT_QUERY_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_covers_whole_catalog_for_any_center() {
        let centers = [(51.505, -0.09), (0.0, 0.0), (-90.0, 180.0), (89.9, -179.9)];

        for (lat, lon) in centers {
            let center = Coordinate::new(lat, lon).unwrap();
            let spec = build_query(center, DEFAULT_RADIUS_M);

            assert_eq!(spec.predicates().len(), CATALOG.len());
            assert_eq!(spec.radius_m(), 3000);
            assert_eq!(spec.center(), center);
        }
    }

    #[test]
    fn test_configured_radius_is_kept() {
        let builder = QueryBuilder::new(1200, 10);
        let spec = builder.build(Coordinate::new(48.85, 2.35).unwrap());

        assert_eq!(spec.radius_m(), 1200);
        assert_eq!(spec.timeout_secs(), 10);
    }

    #[test]
    fn test_eateries_are_point_only_and_parks_cover_all_geometries() {
        for p in CATALOG {
            match (p.category, p.tag.value) {
                (Category::Eatery, _) => assert_eq!(p.kinds, POINT_ONLY),
                (Category::Nature, Some("park")) | (Category::Historic, None) => {
                    assert_eq!(p.kinds, ALL_GEOMETRIES)
                }
                _ => assert!(p.kinds.contains(&ElementKind::Node)),
            }
        }
    }

    #[test]
    fn test_catalog_covers_every_category() {
        for category in [
            Category::Historic,
            Category::Attraction,
            Category::Nature,
            Category::Eatery,
        ] {
            assert!(CATALOG.iter().any(|p| p.category == category));
        }
    }
}
