//! Error types for the query layer.

use crate::store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TourGeoError>;

#[derive(Debug, Error)]
pub enum TourGeoError {
    #[error("longitude and latitude are both required")]
    MissingCoordinates,

    #[error("a {kind} needs at least {required} points, got {actual}")]
    InsufficientVertices {
        kind: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("radius {requested} m exceeds the maximum of {max} m")]
    RadiusTooLarge { requested: f64, max: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("store query `{operation}` failed: {source}")]
    StoreQueryFailed {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TourGeoError {
    /// Returns `true` for errors caused by the request itself. These are
    /// detected before any store call and must not be retried.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCoordinates
                | Self::InsufficientVertices { .. }
                | Self::RadiusTooLarge { .. }
                | Self::InvalidInput(_)
                | Self::InvalidGeometry(_)
                | Self::NotFound { .. }
        )
    }

    /// Wraps a store failure and logs it with the operation's identifying
    /// parameters. Callers pass radii, counts or ids in `detail`, never raw
    /// coordinates.
    pub(crate) fn store(
        operation: &'static str,
        detail: impl std::fmt::Display,
        source: StoreError,
    ) -> Self {
        log::error!("Store query {} failed ({}): {}", operation, detail, source);
        Self::StoreQueryFailed { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(TourGeoError::MissingCoordinates.is_client_error());
        assert!(
            TourGeoError::RadiusTooLarge {
                requested: 60_000.0,
                max: 50_000.0
            }
            .is_client_error()
        );
        assert!(
            !TourGeoError::store("read_routes", "all", StoreError::Unavailable("down".into()))
                .is_client_error()
        );
        assert!(!TourGeoError::Config("bad".into()).is_client_error());
    }

    #[test]
    fn test_messages() {
        let err = TourGeoError::InsufficientVertices {
            kind: "route",
            required: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "a route needs at least 2 points, got 1");

        let err = TourGeoError::NotFound {
            entity: "route",
            id: 42,
        };
        assert_eq!(err.to_string(), "route 42 not found");
    }
}
