//! One entry point per endpoint.
//!
//! `TourGeo` owns the store and the configuration and holds no other state,
//! so a single instance can serve concurrent requests when the store allows
//! it.

use crate::codec;
use crate::config::SearchConfig;
use crate::error::{Result, TourGeoError};
use crate::request::{ProximityRequest, RouteCreateRequest, ZoneRequest};
use crate::routes::RouteLengthResolver;
use crate::search::{PairProximity, ProximitySearch, ZoneSearch};
use crate::store::{MemoryStore, SpatialStore};
use crate::validation::GeometryValidator;
use tourgeo_types::{ProximityResult, Route, RouteId, Site, SiteId, SitePairDistance};

pub struct TourGeo<S: SpatialStore> {
    store: S,
    config: SearchConfig,
}

impl TourGeo<MemoryStore> {
    /// Query layer over an empty embedded store with default settings.
    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: SpatialStore> TourGeo<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(store: S, config: SearchConfig) -> Result<Self> {
        config.validate().map_err(TourGeoError::Config)?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn validator(&self) -> GeometryValidator {
        GeometryValidator::new(&self.config)
    }

    /// General site search; the radius comes from the request and falls
    /// back to `default_radius_m`.
    pub fn search_nearby(&self, request: &ProximityRequest) -> Result<Vec<ProximityResult>> {
        let validator = self.validator();
        let origin = validator.require_coordinates(request.longitude, request.latitude)?;
        let radius = validator.validate_radius(request.radius, self.config.default_radius_m)?;
        ProximitySearch::new(&self.store, validator).search(&origin, radius)
    }

    /// Nearby-sites endpoint: always searches `nearby_radius_m`.
    pub fn nearby_sites(&self, request: &ProximityRequest) -> Result<Vec<ProximityResult>> {
        let validator = self.validator();
        let origin = validator.require_coordinates(request.longitude, request.latitude)?;
        let radius = validator.validate_radius(None, self.config.nearby_radius_m)?;
        ProximitySearch::new(&self.store, validator).search(&origin, radius)
    }

    pub fn sites_in_zone(&self, request: &ZoneRequest) -> Result<Vec<Site>> {
        let zone = request.to_zone()?;
        ZoneSearch::new(&self.store, self.validator()).search(&zone)
    }

    pub fn create_route(&self, request: &RouteCreateRequest) -> Result<RouteId> {
        let resolver = self.route_resolver();
        let pending = resolver.prepare(
            request.name.clone(),
            request.description.clone(),
            request.owner_id,
            request.path()?,
        )?;
        Ok(resolver.persist(pending)?.id)
    }

    pub fn routes(&self) -> Result<Vec<Route>> {
        self.route_resolver().routes()
    }

    pub fn route(&self, id: RouteId) -> Result<Route> {
        self.route_resolver().route(id)
    }

    pub fn site(&self, id: SiteId) -> Result<Site> {
        let row = self
            .store
            .site_by_id(id)
            .map_err(|e| TourGeoError::store("site_by_id", format_args!("id={}", id), e))?
            .ok_or(TourGeoError::NotFound { entity: "site", id })?;
        Ok(codec::decode_site(row))
    }

    /// Sites of `target_category` within `pair_radius_m` of a site of
    /// `anchor_category`, closest pairs first.
    pub fn category_pairs(
        &self,
        anchor_category: &str,
        target_category: &str,
    ) -> Result<Vec<SitePairDistance>> {
        PairProximity::new(&self.store, self.config.pair_radius_m)
            .search(anchor_category, target_category)
    }

    fn route_resolver(&self) -> RouteLengthResolver<'_, S> {
        RouteLengthResolver::new(&self.store, self.validator(), self.config.length_precision)
    }
}
