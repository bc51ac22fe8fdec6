use std::sync::Arc;

use crate::auth::SessionStore;
use crate::search::client::JobSearchApi;
use crate::wipe::storage::NamespaceProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no SerpApi key is configured; searches then fail with a configuration error.
    pub job_search: Option<Arc<dyn JobSearchApi>>,
    /// Per-user file and key-value namespaces for the data wipe.
    pub namespaces: Arc<dyn NamespaceProvider>,
    pub sessions: Arc<dyn SessionStore>,
}
