//! Embedded spatial store backed by an R*-tree.
//!
//! Implements the full [`SpatialStore`] capability in process: geodesic
//! radius search on the WGS84 ellipsoid, point-in-polygon containment,
//! WKT route ingestion and geodesic route length. Sites are indexed by
//! their native (longitude, latitude) position; every radius query prunes
//! with a conservative lon/lat envelope before computing exact distances.
//!
//! ```rust
//! use tourgeo::store::{MemoryStore, NewSite, SpatialStore};
//! use tourgeo::{GeoPoint, codec};
//!
//! let store = MemoryStore::new();
//! let plaza = GeoPoint::new(-33.4372, -70.6506);
//! store.insert_site(NewSite::new("Plaza de Armas", "Plaza", plaza))?;
//!
//! let rows = store.proximity_search(codec::encode_point(&plaza), 100.0)?;
//! assert_eq!(rows.len(), 1);
//! # Ok::<(), tourgeo::store::StoreError>(())
//! ```

use super::{
    NewRouteRow, PairRow, ProximityRow, RouteRow, SiteRow, SpatialStore, StoreError, StorePoint,
    StoreResult,
};
use crate::codec;
use geo::{BoundingRect, Contains, Coord, Distance, Geodesic, LineString, Point, Polygon};
use geojson::{Geometry, Value};
use parking_lot::RwLock;
use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use std::time::SystemTime;
use tourgeo_types::{GeoPoint, RouteId, SiteId};

/// Shortest length of one degree of latitude on WGS84 (at the equator).
const METERS_PER_DEGREE_LAT_MIN: f64 = 110_574.0;
/// Length of one degree of longitude at the equator.
const METERS_PER_DEGREE_LON_EQUATOR: f64 = 111_320.0;
/// Envelope inflation so that pruning never drops a point inside the radius.
const ENVELOPE_MARGIN: f64 = 1.05;
/// Above this latitude the envelope spans all longitudes.
const POLAR_LATITUDE: f64 = 89.0;

/// Site fields for seeding the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSite {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: GeoPoint,
    pub average_rating: f64,
    pub review_count: u32,
}

impl NewSite {
    pub fn new(name: impl Into<String>, category: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: category.into(),
            location,
            average_rating: 0.0,
            review_count: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rating(mut self, average_rating: f64, review_count: u32) -> Self {
        self.average_rating = average_rating;
        self.review_count = review_count;
        self
    }
}

/// Site position in the R*-tree.
#[derive(Debug, Clone, PartialEq)]
struct IndexedSite {
    x: f64,
    y: f64,
    id: SiteId,
}

impl RTreeObject for IndexedSite {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

#[derive(Debug, Clone)]
struct StoredRoute {
    id: RouteId,
    name: String,
    description: String,
    owner_id: u64,
    line: LineString<f64>,
    created_at: SystemTime,
}

#[derive(Default)]
struct Inner {
    sites: FxHashMap<SiteId, SiteRow>,
    index: RTree<IndexedSite>,
    routes: FxHashMap<RouteId, StoredRoute>,
    last_site_id: SiteId,
    last_route_id: RouteId,
}

/// In-process [`SpatialStore`].
///
/// Readers share a `RwLock`; inserts take the write side briefly.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a site and return its generated identifier.
    pub fn insert_site(&self, site: NewSite) -> StoreResult<SiteId> {
        if !site.location.is_valid() {
            return Err(StoreError::RejectedGeometry(format!(
                "site '{}' has an invalid location",
                site.name
            )));
        }

        let location = codec::encode_point(&site.location);
        let mut inner = self.inner.write();
        inner.last_site_id += 1;
        let id = inner.last_site_id;

        inner.index.insert(IndexedSite {
            x: location.x,
            y: location.y,
            id,
        });
        inner.sites.insert(
            id,
            SiteRow {
                id,
                name: site.name,
                description: site.description,
                category: site.category,
                location,
                average_rating: site.average_rating,
                review_count: site.review_count,
            },
        );

        log::debug!("Inserted site {}", id);
        Ok(id)
    }

    pub fn site_count(&self) -> usize {
        self.inner.read().sites.len()
    }

    pub fn route_count(&self) -> usize {
        self.inner.read().routes.len()
    }
}

impl Inner {
    /// Sites within `radius` of `center` with their geodesic distance,
    /// unordered.
    fn sites_within(&self, center: StorePoint, radius: f64) -> Vec<(&SiteRow, f64)> {
        let origin = Point::new(center.x, center.y);
        let envelope = radius_envelope(center, radius);

        self.index
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(|indexed| {
                let distance = Geodesic.distance(origin, Point::new(indexed.x, indexed.y));
                if distance.is_finite() && distance <= radius {
                    self.sites.get(&indexed.id).map(|row| (row, distance))
                } else {
                    None
                }
            })
            .collect()
    }

    fn route_row(route: &StoredRoute) -> RouteRow {
        let coords = route.line.coords().map(|c| vec![c.x, c.y]).collect();
        RouteRow {
            id: route.id,
            name: route.name.clone(),
            description: route.description.clone(),
            owner_id: route.owner_id,
            geometry: Geometry::new(Value::LineString(coords)),
            length_km: geodesic_length_m(&route.line) / 1000.0,
            created_at: route.created_at,
        }
    }
}

impl SpatialStore for MemoryStore {
    fn proximity_search(
        &self,
        origin: StorePoint,
        radius_meters: f64,
    ) -> StoreResult<Vec<ProximityRow>> {
        check_native_point(origin)?;
        check_radius(radius_meters)?;

        let inner = self.inner.read();
        let mut rows: Vec<ProximityRow> = inner
            .sites_within(origin, radius_meters)
            .into_iter()
            .map(|(site, distance_meters)| ProximityRow {
                site: site.clone(),
                distance_meters,
            })
            .collect();

        rows.sort_by(|a, b| {
            a.distance_meters
                .total_cmp(&b.distance_meters)
                .then_with(|| a.site.id.cmp(&b.site.id))
        });
        Ok(rows)
    }

    fn within_polygon(&self, polygon_wkt: &str) -> StoreResult<Vec<SiteRow>> {
        let ring = codec::parse_polygon(polygon_wkt)
            .map_err(|e| StoreError::RejectedGeometry(e.to_string()))?;
        for point in &ring {
            check_native_point(*point)?;
        }

        let polygon = Polygon::new(
            LineString::from(
                ring.iter()
                    .map(|p| Coord { x: p.x, y: p.y })
                    .collect::<Vec<_>>(),
            ),
            vec![],
        );
        let Some(bounds) = polygon.bounding_rect() else {
            return Ok(Vec::new());
        };
        let envelope = AABB::from_corners(
            [bounds.min().x, bounds.min().y],
            [bounds.max().x, bounds.max().y],
        );

        let inner = self.inner.read();
        let rows = inner
            .index
            .locate_in_envelope_intersecting(&envelope)
            .filter(|indexed| polygon.contains(&Point::new(indexed.x, indexed.y)))
            .filter_map(|indexed| inner.sites.get(&indexed.id).cloned())
            .collect();
        Ok(rows)
    }

    fn insert_route(&self, route: NewRouteRow) -> StoreResult<RouteId> {
        let points = codec::parse_line(&route.line_wkt)
            .map_err(|e| StoreError::RejectedGeometry(e.to_string()))?;
        for point in &points {
            check_native_point(*point)?;
        }
        if route.name.trim().is_empty() {
            return Err(StoreError::Constraint("route name must not be empty".into()));
        }

        let line: LineString<f64> = points.iter().map(|p| Coord { x: p.x, y: p.y }).collect();

        let mut inner = self.inner.write();
        inner.last_route_id += 1;
        let id = inner.last_route_id;
        inner.routes.insert(
            id,
            StoredRoute {
                id,
                name: route.name,
                description: route.description,
                owner_id: route.owner_id,
                line,
                created_at: SystemTime::now(),
            },
        );
        Ok(id)
    }

    fn read_routes(&self) -> StoreResult<Vec<RouteRow>> {
        let inner = self.inner.read();
        let mut routes: Vec<&StoredRoute> = inner.routes.values().collect();
        routes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(routes.into_iter().map(Inner::route_row).collect())
    }

    fn read_route(&self, id: RouteId) -> StoreResult<Option<RouteRow>> {
        Ok(self.inner.read().routes.get(&id).map(Inner::route_row))
    }

    fn site_by_id(&self, id: SiteId) -> StoreResult<Option<SiteRow>> {
        Ok(self.inner.read().sites.get(&id).cloned())
    }

    fn category_pairs_within(
        &self,
        anchor_category: &str,
        target_category: &str,
        radius_meters: f64,
    ) -> StoreResult<Vec<PairRow>> {
        check_radius(radius_meters)?;

        let inner = self.inner.read();
        let mut pairs: Vec<PairRow> = inner
            .sites
            .values()
            .filter(|anchor| anchor.category == anchor_category)
            .flat_map(|anchor| {
                inner
                    .sites_within(anchor.location, radius_meters)
                    .into_iter()
                    .filter(move |(target, _)| {
                        target.id != anchor.id && target.category == target_category
                    })
                    .map(move |(target, distance_meters)| PairRow {
                        anchor_name: anchor.name.clone(),
                        target_name: target.name.clone(),
                        distance_meters,
                    })
            })
            .collect();

        pairs.sort_by(|a, b| {
            a.distance_meters
                .total_cmp(&b.distance_meters)
                .then_with(|| a.anchor_name.cmp(&b.anchor_name))
                .then_with(|| a.target_name.cmp(&b.target_name))
        });
        Ok(pairs)
    }
}

fn check_native_point(point: StorePoint) -> StoreResult<()> {
    if !point.x.is_finite()
        || !point.y.is_finite()
        || !(-180.0..=180.0).contains(&point.x)
        || !(-90.0..=90.0).contains(&point.y)
    {
        return Err(StoreError::RejectedGeometry(
            "coordinate outside the WGS84 range".to_string(),
        ));
    }
    Ok(())
}

fn check_radius(radius: f64) -> StoreResult<()> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(StoreError::RejectedGeometry(format!(
            "radius must be a non-negative number, got {}",
            radius
        )));
    }
    Ok(())
}

/// Geodesic length of a line in meters, summed segment by segment.
fn geodesic_length_m(line: &LineString<f64>) -> f64 {
    line.lines()
        .map(|segment| Geodesic.distance(Point::from(segment.start), Point::from(segment.end)))
        .sum()
}

/// Lon/lat box guaranteed to contain every point within `radius` meters of
/// `center`. Falls back to the full longitude range near the poles and across
/// the antimeridian.
fn radius_envelope(center: StorePoint, radius: f64) -> AABB<[f64; 2]> {
    let lat_degrees = radius / METERS_PER_DEGREE_LAT_MIN * ENVELOPE_MARGIN;
    let min_y = (center.y - lat_degrees).max(-90.0);
    let max_y = (center.y + lat_degrees).min(90.0);

    let max_abs_lat = min_y.abs().max(max_y.abs());
    let (min_x, max_x) = if max_abs_lat >= POLAR_LATITUDE {
        (-180.0, 180.0)
    } else {
        let lon_degrees = radius
            / (METERS_PER_DEGREE_LON_EQUATOR * max_abs_lat.to_radians().cos())
            * ENVELOPE_MARGIN;
        let (min_x, max_x) = (center.x - lon_degrees, center.x + lon_degrees);
        if min_x < -180.0 || max_x > 180.0 {
            (-180.0, 180.0)
        } else {
            (min_x, max_x)
        }
    };

    AABB::from_corners([min_x, min_y], [max_x, max_y])
}
