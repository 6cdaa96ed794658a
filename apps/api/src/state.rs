use std::sync::Arc;

use crate::catalog::domains::DomainTable;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::learners::store::ProfileStore;
use crate::pathing::path_builder::PathBuilder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup, read-only afterwards.
    pub catalog: Arc<CatalogStore>,
    pub domains: Arc<DomainTable>,
    pub profiles: Arc<ProfileStore>,
    /// Pluggable path builder. Default: RuleBasedPathBuilder.
    pub path_builder: Arc<dyn PathBuilder>,
    pub config: Config,
}
