//! Collaborators used by background actions
//!
//! The engine never talks to the network directly: every call goes through
//! one of these trait objects, so tests can swap in fakes.

use std::sync::Arc;

use gamecast_backend::{
    AuthProvider, CatalogSource, EnvTokenProvider, FileTokenProvider, HttpBackend, HttpCatalog,
    HttpSessionApi, NoCredentials, SdkConnector, SessionApi, StaticTokenProvider,
    WebViewConnector,
};
use gamecast_core::prelude::*;

use crate::config::{AuthSettings, Settings};

/// Backend, catalog, SDK and credential collaborators
#[derive(Clone)]
pub struct Services {
    pub session_api: Arc<dyn SessionApi>,
    pub catalog: Arc<dyn CatalogSource>,
    pub connector: Arc<dyn SdkConnector>,
    pub auth: Arc<dyn AuthProvider>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

impl Services {
    /// Production collaborators built from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let auth = auth_provider(&settings.auth);
        let backend = HttpBackend::new(
            &settings.api.base_url,
            settings.api.request_timeout(),
            auth.clone(),
        )?;

        let connector = WebViewConnector::new(
            settings.webview.endpoint.clone(),
            settings.webview.connect_timeout(),
            settings.webview.signal_timeout(),
        );

        Ok(Self {
            session_api: Arc::new(HttpSessionApi::new(backend.clone())),
            catalog: Arc::new(HttpCatalog::new(backend)),
            connector: Arc::new(connector),
            auth,
        })
    }
}

/// First configured token source wins: `token`, `token_env`, `token_file`
pub fn auth_provider(auth: &AuthSettings) -> Arc<dyn AuthProvider> {
    let user_id = auth.user_id.clone();

    if let Some(token) = auth.token.as_ref().filter(|t| !t.is_empty()) {
        debug!("Using static token from settings");
        return Arc::new(StaticTokenProvider::new(token.clone(), user_id));
    }
    if let Some(var) = auth.token_env.as_ref().filter(|v| !v.is_empty()) {
        debug!("Reading token from ${}", var);
        return Arc::new(EnvTokenProvider::new(var.clone(), user_id));
    }
    if let Some(path) = &auth.token_file {
        debug!("Reading token from {:?}", path);
        return Arc::new(FileTokenProvider::new(path.clone(), user_id));
    }

    warn!("No token source configured; every backend call will be rejected");
    Arc::new(NoCredentials)
}
