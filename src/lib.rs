//! Geospatial query and geometry-encoding layer for tourism sites and routes.
//!
//! Validates client coordinates, encodes them into the store's geometry
//! text, issues radius, containment and join queries against a
//! [`SpatialStore`], and decodes the results with correct units and order.
//!
//! ```rust
//! use tourgeo::{GeoPoint, ProximityRequest, RouteCreateRequest, TourGeo};
//! use tourgeo::store::NewSite;
//!
//! let geo = TourGeo::memory();
//! geo.store()
//!     .insert_site(NewSite::new("Plaza de Armas", "Plaza", GeoPoint::new(-33.4372, -70.6506)))?;
//!
//! let nearby = geo.nearby_sites(&ProximityRequest::new(-70.6500, -33.4380))?;
//! assert_eq!(nearby[0].site.name, "Plaza de Armas");
//!
//! let id = geo.create_route(&RouteCreateRequest {
//!     name: "Centro".into(),
//!     owner_id: 1,
//!     coordinates: vec![vec![-33.4372, -70.6506], vec![-33.4429, -70.6539]],
//!     ..Default::default()
//! })?;
//! assert!(geo.route(id)?.length_km > 0.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod request;
pub mod routes;
pub mod search;
pub mod service;
pub mod store;
pub mod validation;

pub use config::SearchConfig;
pub use error::{Result, TourGeoError};
pub use request::{ProximityRequest, RouteCreateRequest, ZoneRequest};
pub use routes::{PendingRoute, PersistedRoute, RouteLengthResolver};
pub use search::{PairProximity, ProximitySearch, ZoneSearch};
pub use service::TourGeo;
pub use store::{MemoryStore, SpatialStore, StoreError};
pub use validation::GeometryValidator;

pub use tourgeo_types::{
    GeoPoint, OwnerId, ProximityResult, Route, RouteId, SearchZone, Site, SiteId,
    SitePairDistance,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{Result, TourGeo, TourGeoError};

    pub use crate::{ProximityRequest, RouteCreateRequest, ZoneRequest};

    pub use crate::{GeoPoint, ProximityResult, Route, SearchZone, Site};

    pub use crate::{MemoryStore, SearchConfig, SpatialStore};
}
