use serde::{Deserialize, Serialize};

/// A geographic position in the client convention: latitude first.
///
/// Stores and geometry encodings use longitude-first ordering; converting
/// between the two is the job of the codec in the `tourgeo` crate and never
/// happens implicitly here.
///
/// # Examples
///
/// ```
/// use tourgeo_types::point::GeoPoint;
///
/// let p = GeoPoint::new(-33.45, -70.66);
/// assert_eq!(p.latitude, -33.45);
/// assert_eq!(p.longitude, -70.66);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when both coordinates are finite and within
    /// latitude [-90, 90] and longitude [-180, 180].
    ///
    /// # Examples
    ///
    /// ```
    /// use tourgeo_types::point::GeoPoint;
    ///
    /// assert!(GeoPoint::new(90.0, -180.0).is_valid());
    /// assert!(!GeoPoint::new(91.0, 0.0).is_valid());
    /// assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns `true` when both coordinates differ by less than `tolerance`.
    pub fn approx_eq(&self, other: &GeoPoint, tolerance: f64) -> bool {
        (self.latitude - other.latitude).abs() < tolerance
            && (self.longitude - other.longitude).abs() < tolerance
    }
}
