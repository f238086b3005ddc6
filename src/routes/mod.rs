// Route exports
pub mod groups;
pub mod matches;

use actix_web::web;
use std::sync::Arc;
use crate::core::Matcher;
use crate::services::{MatchCache, PostgresClient, SupabaseClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub supabase: Arc<SupabaseClient>,
    pub postgres: Arc<PostgresClient>,
    /// Absent when disabled or when Redis was unreachable at startup
    pub cache: Option<Arc<MatchCache>>,
    pub matcher: Matcher,
    pub max_limit: usize,
}

impl AppState {
    /// Resolve a requested limit against the configured default and cap
    pub fn effective_limit(&self, requested: Option<u16>) -> usize {
        resolve_limit(requested, self.matcher.default_limit(), self.max_limit)
    }
}

pub(crate) fn resolve_limit(requested: Option<u16>, default_limit: usize, max_limit: usize) -> usize {
    requested
        .map(usize::from)
        .unwrap_or(default_limit)
        .min(max_limit)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(groups::configure),
    );
}
