//! Route persistence and store-derived route length.
//!
//! A route moves through two states. [`PendingRoute`] holds a validated path
//! that has not been encoded yet; [`PersistedRoute`] exists once the store
//! has accepted the encoded line and assigned an identifier. `persist`
//! consumes the pending value, so there is no way back and no way to change
//! a stored path.
//!
//! Length is never taken from the client. Each read asks the store for the
//! geodesic length of the stored line and rounds it to a fixed number of
//! decimals, so `length_km` always matches `path`.

use crate::codec;
use crate::config::MAX_LENGTH_PRECISION;
use crate::error::{Result, TourGeoError};
use crate::store::{NewRouteRow, RouteRow, SpatialStore, StoreError};
use crate::validation::GeometryValidator;
use tourgeo_types::{GeoPoint, OwnerId, Route, RouteId};

/// A route whose vertices passed validation but which is not stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRoute {
    name: String,
    description: String,
    owner_id: OwnerId,
    path: Vec<GeoPoint>,
}

impl PendingRoute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }
}

/// A stored route; its length is computable from here on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedRoute {
    pub id: RouteId,
}

pub struct RouteLengthResolver<'a, S: SpatialStore + ?Sized> {
    store: &'a S,
    validator: GeometryValidator,
    precision: u32,
}

impl<'a, S: SpatialStore + ?Sized> RouteLengthResolver<'a, S> {
    /// `precision` is the number of decimals kept in `length_km`.
    pub fn new(store: &'a S, validator: GeometryValidator, precision: u32) -> Self {
        Self {
            store,
            validator,
            precision,
        }
    }

    /// Validates a new route's vertices.
    pub fn prepare(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        owner_id: OwnerId,
        path: Vec<GeoPoint>,
    ) -> Result<PendingRoute> {
        self.validator.validate_route_points(&path)?;
        Ok(PendingRoute {
            name: name.into(),
            description: description.into(),
            owner_id,
            path,
        })
    }

    /// Encodes the path as a linestring and stores it.
    pub fn persist(&self, route: PendingRoute) -> Result<PersistedRoute> {
        let line_wkt = codec::encode_line(&route.path)?;
        let vertices = route.path.len();
        let owner_id = route.owner_id;

        let id = self
            .store
            .insert_route(NewRouteRow {
                name: route.name,
                description: route.description,
                owner_id,
                line_wkt,
            })
            .map_err(|e| {
                TourGeoError::store(
                    "insert_route",
                    format_args!("owner={}, vertices={}", owner_id, vertices),
                    e,
                )
            })?;

        log::info!(
            "Created route {} for owner {} with {} vertices",
            id,
            owner_id,
            vertices
        );
        Ok(PersistedRoute { id })
    }

    /// All stored routes, newest first, with store-derived lengths.
    pub fn routes(&self) -> Result<Vec<Route>> {
        let rows = self
            .store
            .read_routes()
            .map_err(|e| TourGeoError::store("read_routes", "all", e))?;

        log::debug!("Read {} routes", rows.len());
        rows.into_iter().map(|row| self.decode(row)).collect()
    }

    pub fn route(&self, id: RouteId) -> Result<Route> {
        let row = self
            .store
            .read_route(id)
            .map_err(|e| TourGeoError::store("read_route", format_args!("id={}", id), e))?
            .ok_or(TourGeoError::NotFound { entity: "route", id })?;
        self.decode(row)
    }

    fn decode(&self, row: RouteRow) -> Result<Route> {
        let path = codec::decode_exchange_line(&row.geometry).map_err(|e| {
            TourGeoError::store(
                "read_routes",
                format_args!("id={}", row.id),
                StoreError::MalformedRow(e.to_string()),
            )
        })?;

        Ok(Route {
            id: row.id,
            name: row.name,
            description: row.description,
            owner_id: row.owner_id,
            path,
            geometry: row.geometry,
            length_km: round_to(row.length_km, self.precision),
            created_at: row.created_at,
        })
    }
}

/// Rounds half away from zero to `digits` decimals, capped at
/// [`MAX_LENGTH_PRECISION`].
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(MAX_LENGTH_PRECISION) as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::store::MemoryStore;

    fn resolver(store: &MemoryStore) -> RouteLengthResolver<'_, MemoryStore> {
        RouteLengthResolver::new(store, GeometryValidator::new(&SearchConfig::default()), 2)
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.235, 1), 1.2);
        assert_eq!(round_to(0.999, 2), 1.0);
        assert_eq!(round_to(12.5, 0), 13.0);
    }

    #[test]
    fn test_round_to_stays_finite_at_large_precision() {
        let length_km = 12.345_678_9;
        let at_bound = round_to(length_km, MAX_LENGTH_PRECISION);
        assert!(at_bound.is_finite());
        assert!((at_bound - length_km).abs() < 1e-12);

        assert!(round_to(length_km, 400).is_finite());
        assert!(round_to(length_km, u32::MAX).is_finite());
    }

    #[test]
    fn test_prepare_rejects_single_point() {
        let store = MemoryStore::new();
        let err = resolver(&store)
            .prepare("Solo", "", 1, vec![GeoPoint::new(-33.4, -70.6)])
            .unwrap_err();
        assert!(matches!(err, TourGeoError::InsufficientVertices { .. }));
        assert_eq!(store.route_count(), 0);
    }

    #[test]
    fn test_persist_then_read() {
        let store = MemoryStore::new();
        let resolver = resolver(&store);
        let path = vec![GeoPoint::new(-33.40, -70.60), GeoPoint::new(-33.41, -70.61)];

        let pending = resolver
            .prepare("Paseo", "Centro historico", 9, path.clone())
            .unwrap();
        assert_eq!(pending.name(), "Paseo");
        assert_eq!(pending.owner_id(), 9);
        assert_eq!(pending.path(), path.as_slice());

        let persisted = resolver.persist(pending).unwrap();
        let route = resolver.route(persisted.id).unwrap();

        assert_eq!(route.name, "Paseo");
        assert_eq!(route.owner_id, 9);
        assert_eq!(route.path.len(), 2);
        for (original, stored) in path.iter().zip(&route.path) {
            assert!(original.approx_eq(stored, 1e-9));
        }
        assert_eq!(route.length_km, round_to(route.length_km, 2));
        assert!(route.length_km > 1.0 && route.length_km < 2.0);
    }

    #[test]
    fn test_missing_route_is_not_found() {
        let store = MemoryStore::new();
        let err = resolver(&store).route(5).unwrap_err();
        assert!(matches!(
            err,
            TourGeoError::NotFound {
                entity: "route",
                id: 5
            }
        ));
    }
}
