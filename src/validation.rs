//! Request validation, run before anything is encoded or sent to the store.

use crate::config::SearchConfig;
use crate::error::{Result, TourGeoError};
use tourgeo_types::GeoPoint;

pub const MIN_ROUTE_POINTS: usize = 2;
pub const MIN_ZONE_POINTS: usize = 3;

/// Validates client geometry against the configured limits.
///
/// # Examples
///
/// ```
/// use tourgeo::validation::GeometryValidator;
/// use tourgeo::SearchConfig;
///
/// let config = SearchConfig::default();
/// let validator = GeometryValidator::new(&config);
///
/// assert_eq!(validator.validate_radius(None, config.default_radius_m)?, 1000.0);
/// assert_eq!(validator.validate_radius(Some(0.0), config.nearby_radius_m)?, 5000.0);
/// assert!(validator.validate_radius(Some(50_001.0), config.default_radius_m).is_err());
/// # Ok::<(), tourgeo::TourGeoError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GeometryValidator {
    max_radius_m: f64,
}

impl GeometryValidator {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            max_radius_m: config.max_radius_m,
        }
    }

    /// Fails with `InsufficientVertices` when a route has fewer than 2 points,
    /// and with `InvalidInput` when any point is out of range.
    pub fn validate_route_points(&self, points: &[GeoPoint]) -> Result<()> {
        require_vertices("route", points, MIN_ROUTE_POINTS)?;
        validate_points(points)
    }

    /// Fails with `InsufficientVertices` when a zone has fewer than 3 points,
    /// and with `InvalidInput` when any point is out of range.
    pub fn validate_zone_points(&self, points: &[GeoPoint]) -> Result<()> {
        require_vertices("zone", points, MIN_ZONE_POINTS)?;
        validate_points(points)
    }

    /// Resolves the radius to search with.
    ///
    /// Absent or non-positive radii fall back to `default_m`, which each
    /// endpoint passes from its own configuration value.
    pub fn validate_radius(&self, radius_m: Option<f64>, default_m: f64) -> Result<f64> {
        match radius_m {
            Some(r) if r.is_nan() => Err(TourGeoError::InvalidInput(
                "radius must be a number".to_string(),
            )),
            Some(r) if r > self.max_radius_m => Err(TourGeoError::RadiusTooLarge {
                requested: r,
                max: self.max_radius_m,
            }),
            Some(r) if r > 0.0 => Ok(r),
            _ => Ok(default_m),
        }
    }

    /// Builds the search origin; both coordinates must be present.
    pub fn require_coordinates(
        &self,
        longitude: Option<f64>,
        latitude: Option<f64>,
    ) -> Result<GeoPoint> {
        let (Some(longitude), Some(latitude)) = (longitude, latitude) else {
            return Err(TourGeoError::MissingCoordinates);
        };
        let origin = GeoPoint::new(latitude, longitude);
        validate_point(&origin)?;
        Ok(origin)
    }
}

fn require_vertices(kind: &'static str, points: &[GeoPoint], required: usize) -> Result<()> {
    if points.len() < required {
        return Err(TourGeoError::InsufficientVertices {
            kind,
            required,
            actual: points.len(),
        });
    }
    Ok(())
}

/// Checks that a point is finite and inside latitude [-90, 90] and
/// longitude [-180, 180].
pub fn validate_point(point: &GeoPoint) -> Result<()> {
    if !point.latitude.is_finite() || !point.longitude.is_finite() {
        return Err(TourGeoError::InvalidInput(format!(
            "coordinates must be finite, got ({}, {})",
            point.latitude, point.longitude
        )));
    }

    if !(-90.0..=90.0).contains(&point.latitude) {
        return Err(TourGeoError::InvalidInput(format!(
            "latitude out of range [-90, 90]: {}",
            point.latitude
        )));
    }

    if !(-180.0..=180.0).contains(&point.longitude) {
        return Err(TourGeoError::InvalidInput(format!(
            "longitude out of range [-180, 180]: {}",
            point.longitude
        )));
    }

    Ok(())
}

pub fn validate_points(points: &[GeoPoint]) -> Result<()> {
    for (idx, point) in points.iter().enumerate() {
        validate_point(point).map_err(|e| {
            TourGeoError::InvalidInput(format!("point at index {}: {}", idx, e))
        })?;
    }
    Ok(())
}
