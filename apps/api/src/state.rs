use std::sync::Arc;

use crate::config::Config;
use crate::matching::taxonomy::SkillTaxonomy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup, read-only afterwards.
    pub taxonomy: Arc<SkillTaxonomy>,
}
