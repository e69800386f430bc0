//! # tourgeo-types
//!
//! Value types shared by the tourgeo query layer:
//!
//! - **Coordinates**: `GeoPoint` in the client's latitude-first convention
//! - **Sites**: `Site`, `ProximityResult`, `SitePairDistance`
//! - **Routes**: `Route`, `SearchZone`
//!
//! All types are serializable with Serde. Field names are camelCase on the
//! wire to match the response layer.
//!
//! ## Examples
//!
//! ```rust
//! use tourgeo_types::point::GeoPoint;
//!
//! let plaza = GeoPoint::new(-33.4372, -70.6506); // Santiago, lat first
//! assert!(plaza.is_valid());
//! ```

pub mod point;
pub mod route;
pub mod site;

pub use point::GeoPoint;
pub use route::{Route, SearchZone};
pub use site::{ProximityResult, Site, SitePairDistance};

/// Identifier assigned by the store to a site.
pub type SiteId = u64;

/// Identifier assigned by the store to a route.
pub type RouteId = u64;

/// Identifier of the user that owns a route.
pub type OwnerId = u64;
