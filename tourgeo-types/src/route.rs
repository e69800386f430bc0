use crate::point::GeoPoint;
use crate::{OwnerId, RouteId};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// A persisted route.
///
/// `path` is fixed at creation. `length_km` is derived by the store from the
/// stored geometry on every read, never supplied by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub description: String,
    pub owner_id: OwnerId,
    pub path: Vec<GeoPoint>,
    /// Stored geometry in the exchange format (`[longitude, latitude]`
    /// arrays), passed through as produced by the store.
    pub geometry: geojson::Geometry,
    pub length_km: f64,
    pub created_at: SystemTime,
}

/// Polygon used to bound a site search. Built per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchZone {
    vertices: Vec<GeoPoint>,
}

impl SearchZone {
    pub fn new(vertices: Vec<GeoPoint>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
