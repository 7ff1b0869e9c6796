//! Backend connection settings.

/// Configuration for the hosted backend's REST surface.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `"https://example.supabase.co"`.
    pub base_url: String,

    /// Anonymous API key sent with every request.
    pub api_key: String,
}

impl BackendConfig {
    /// Creates a configuration, normalizing a trailing slash on the URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Full URL of a REST resource under `/rest/v1`.
    #[must_use]
    pub fn rest_url(&self, resource: &str) -> String {
        format!("{}/rest/v1/{resource}", self.base_url)
    }
}
