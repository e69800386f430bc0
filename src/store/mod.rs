//! Store capability boundary.
//!
//! The query layer never computes distances, containment or lengths itself.
//! It hands encoded geometry to a [`SpatialStore`] and decodes what comes
//! back. Rows carry store-native, longitude-first coordinates; only the codec
//! turns them into [`GeoPoint`](tourgeo_types::GeoPoint) values.

pub mod memory;

pub use memory::{MemoryStore, NewSite};

use std::time::SystemTime;
use thiserror::Error;
use tourgeo_types::{OwnerId, RouteId, SiteId};

/// Failure reported by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("geometry rejected by store: {0}")]
    RejectedGeometry(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("malformed row: {0}")]
    MalformedRow(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read access to a store-native point: X is longitude, Y is latitude.
pub trait NativePoint {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

/// A point in store axis order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorePoint {
    pub x: f64,
    pub y: f64,
}

impl StorePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl NativePoint for StorePoint {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    fn y(&self) -> f64 {
        self.y
    }
}

/// Site columns as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRow {
    pub id: SiteId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: StorePoint,
    pub average_rating: f64,
    pub review_count: u32,
}

/// A site row plus its geodesic distance from the query origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityRow {
    pub site: SiteRow,
    pub distance_meters: f64,
}

/// Route columns for an insert; the geometry is WKT.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRouteRow {
    pub name: String,
    pub description: String,
    pub owner_id: OwnerId,
    pub line_wkt: String,
}

/// Route columns as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRow {
    pub id: RouteId,
    pub name: String,
    pub description: String,
    pub owner_id: OwnerId,
    /// Stored line in the exchange format.
    pub geometry: geojson::Geometry,
    /// Geodesic length of the stored line, in kilometers.
    pub length_km: f64,
    pub created_at: SystemTime,
}

/// One result of a category pair join.
#[derive(Debug, Clone, PartialEq)]
pub struct PairRow {
    pub anchor_name: String,
    pub target_name: String,
    pub distance_meters: f64,
}

/// Spatial capabilities the query layer depends on.
///
/// Implementations must be safe to share between concurrent requests.
pub trait SpatialStore: Send + Sync {
    /// Sites within `radius_meters` of `origin`, ascending by geodesic
    /// distance.
    fn proximity_search(
        &self,
        origin: StorePoint,
        radius_meters: f64,
    ) -> StoreResult<Vec<ProximityRow>>;

    /// Sites contained by the WKT polygon. No ordering guarantee.
    fn within_polygon(&self, polygon_wkt: &str) -> StoreResult<Vec<SiteRow>>;

    /// Persist a route and return its generated identifier.
    fn insert_route(&self, route: NewRouteRow) -> StoreResult<RouteId>;

    /// All routes, newest first.
    fn read_routes(&self) -> StoreResult<Vec<RouteRow>>;

    fn read_route(&self, id: RouteId) -> StoreResult<Option<RouteRow>>;

    fn site_by_id(&self, id: SiteId) -> StoreResult<Option<SiteRow>>;

    /// Every `(anchor, target)` pair of distinct sites where the anchor has
    /// category `anchor_category`, the target has `target_category`, and
    /// they lie within `radius_meters`. Ascending by distance.
    fn category_pairs_within(
        &self,
        anchor_category: &str,
        target_category: &str,
        radius_meters: f64,
    ) -> StoreResult<Vec<PairRow>>;
}

impl<S: SpatialStore + ?Sized> SpatialStore for std::sync::Arc<S> {
    fn proximity_search(
        &self,
        origin: StorePoint,
        radius_meters: f64,
    ) -> StoreResult<Vec<ProximityRow>> {
        (**self).proximity_search(origin, radius_meters)
    }

    fn within_polygon(&self, polygon_wkt: &str) -> StoreResult<Vec<SiteRow>> {
        (**self).within_polygon(polygon_wkt)
    }

    fn insert_route(&self, route: NewRouteRow) -> StoreResult<RouteId> {
        (**self).insert_route(route)
    }

    fn read_routes(&self) -> StoreResult<Vec<RouteRow>> {
        (**self).read_routes()
    }

    fn read_route(&self, id: RouteId) -> StoreResult<Option<RouteRow>> {
        (**self).read_route(id)
    }

    fn site_by_id(&self, id: SiteId) -> StoreResult<Option<SiteRow>> {
        (**self).site_by_id(id)
    }

    fn category_pairs_within(
        &self,
        anchor_category: &str,
        target_category: &str,
        radius_meters: f64,
    ) -> StoreResult<Vec<PairRow>> {
        (**self).category_pairs_within(anchor_category, target_category, radius_meters)
    }
}
