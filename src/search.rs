//! Site searches: radius, polygon and category pairs.
//!
//! Each search validates first, encodes once, issues exactly one store call
//! and decodes the rows in the order the store returned them. The store's
//! ordering is authoritative and is never re-sorted here.

use crate::codec;
use crate::error::{Result, TourGeoError};
use crate::store::SpatialStore;
use crate::validation::GeometryValidator;
use tourgeo_types::{GeoPoint, ProximityResult, SearchZone, Site, SitePairDistance};

/// Radius-bounded, nearest-first site lookup.
pub struct ProximitySearch<'a, S: SpatialStore + ?Sized> {
    store: &'a S,
    validator: GeometryValidator,
}

impl<'a, S: SpatialStore + ?Sized> ProximitySearch<'a, S> {
    pub fn new(store: &'a S, validator: GeometryValidator) -> Self {
        Self { store, validator }
    }

    /// Sites within `radius_m` of `origin`, ascending by geodesic distance.
    ///
    /// `radius_m` must already be resolved through
    /// [`GeometryValidator::validate_radius`].
    pub fn search(&self, origin: &GeoPoint, radius_m: f64) -> Result<Vec<ProximityResult>> {
        crate::validation::validate_point(origin)?;
        if radius_m.is_nan() || radius_m <= 0.0 {
            return Err(TourGeoError::InvalidInput(format!(
                "search radius must be positive, got {}",
                radius_m
            )));
        }
        // Resolving against the radius itself only applies the upper bound.
        let radius_m = self.validator.validate_radius(Some(radius_m), radius_m)?;

        let rows = self
            .store
            .proximity_search(codec::encode_point(origin), radius_m)
            .map_err(|e| {
                TourGeoError::store("proximity_search", format_args!("radius={}m", radius_m), e)
            })?;

        log::debug!(
            "Proximity search within {}m returned {} sites",
            radius_m,
            rows.len()
        );

        Ok(rows
            .into_iter()
            .map(|row| ProximityResult {
                site: codec::decode_site(row.site),
                distance_meters: row.distance_meters,
            })
            .collect())
    }
}

/// Polygon containment lookup.
pub struct ZoneSearch<'a, S: SpatialStore + ?Sized> {
    store: &'a S,
    validator: GeometryValidator,
}

impl<'a, S: SpatialStore + ?Sized> ZoneSearch<'a, S> {
    pub fn new(store: &'a S, validator: GeometryValidator) -> Self {
        Self { store, validator }
    }

    /// Every site inside `zone`. No ordering is implied.
    pub fn search(&self, zone: &SearchZone) -> Result<Vec<Site>> {
        self.validator.validate_zone_points(zone.vertices())?;
        let polygon = codec::encode_polygon(zone.vertices())?;

        let rows = self.store.within_polygon(&polygon).map_err(|e| {
            TourGeoError::store("within_polygon", format_args!("vertices={}", zone.len()), e)
        })?;

        log::debug!(
            "Zone search over {} vertices returned {} sites",
            zone.len(),
            rows.len()
        );

        Ok(rows.into_iter().map(codec::decode_site).collect())
    }
}

/// Distance-ordered join between two site categories.
pub struct PairProximity<'a, S: SpatialStore + ?Sized> {
    store: &'a S,
    radius_m: f64,
}

impl<'a, S: SpatialStore + ?Sized> PairProximity<'a, S> {
    pub fn new(store: &'a S, radius_m: f64) -> Self {
        Self { store, radius_m }
    }

    /// Pairs of an `anchor_category` site and a distinct `target_category`
    /// site within the configured radius, closest pairs first.
    pub fn search(
        &self,
        anchor_category: &str,
        target_category: &str,
    ) -> Result<Vec<SitePairDistance>> {
        if anchor_category.trim().is_empty() || target_category.trim().is_empty() {
            return Err(TourGeoError::InvalidInput(
                "both site categories are required".to_string(),
            ));
        }

        let rows = self
            .store
            .category_pairs_within(anchor_category, target_category, self.radius_m)
            .map_err(|e| {
                TourGeoError::store(
                    "category_pairs_within",
                    format_args!(
                        "anchor={}, target={}, radius={}m",
                        anchor_category, target_category, self.radius_m
                    ),
                    e,
                )
            })?;

        log::debug!(
            "Pair search {} -> {} returned {} pairs",
            anchor_category,
            target_category,
            rows.len()
        );

        Ok(rows
            .into_iter()
            .map(|row| SitePairDistance {
                anchor_name: row.anchor_name,
                target_name: row.target_name,
                distance_meters: row.distance_meters,
            })
            .collect())
    }
}
