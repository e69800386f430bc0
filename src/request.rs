//! Request shapes handed over by the HTTP layer after body parsing.
//!
//! Coordinates arrive as raw `[latitude, longitude]` pairs and stay raw
//! until the codec converts them.

use crate::codec;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tourgeo_types::{GeoPoint, OwnerId, SearchZone};

/// Origin of a proximity search. The nearby-sites endpoint ignores `radius`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProximityRequest {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    #[serde(default)]
    pub radius: Option<f64>,
}

impl ProximityRequest {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude: Some(longitude),
            latitude: Some(latitude),
            radius: None,
        }
    }

    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius = Some(radius_m);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneRequest {
    /// Polygon vertices as `[latitude, longitude]` pairs.
    #[serde(default)]
    pub points: Vec<Vec<f64>>,
}

impl ZoneRequest {
    pub fn to_zone(&self) -> Result<SearchZone> {
        Ok(SearchZone::new(codec::from_lat_lon_pairs(&self.points)?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCreateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner_id: OwnerId,
    /// Path vertices as `[latitude, longitude]` pairs.
    #[serde(default)]
    pub coordinates: Vec<Vec<f64>>,
}

impl RouteCreateRequest {
    pub fn path(&self) -> Result<Vec<GeoPoint>> {
        codec::from_lat_lon_pairs(&self.coordinates)
    }
}
