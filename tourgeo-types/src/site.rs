use crate::SiteId;
use crate::point::GeoPoint;
use serde::{Deserialize, Serialize};

/// A tourism site as read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub description: String,
    /// Site type, e.g. "Museo", "Teatro", "Restaurante".
    pub category: String,
    pub location: GeoPoint,
    pub average_rating: f64,
    pub review_count: u32,
}

/// A site found by a radius search together with its geodesic distance from
/// the search origin.
///
/// Within one result set, entries are non-decreasing in `distance_meters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityResult {
    pub site: Site,
    pub distance_meters: f64,
}

/// A pair of sites of two categories lying within a fixed distance of each
/// other, e.g. a restaurant next to a theatre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePairDistance {
    pub anchor_name: String,
    pub target_name: String,
    pub distance_meters: f64,
}
