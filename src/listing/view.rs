use crate::api::{ApiError, PropertySource};
use crate::listing::filter::{self, FilterConfig};
use crate::models::PropertyRecord;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

const LOAD_FAILED: &str = "Failed to load properties. Please try again.";

/// State behind the property list page: fetched records plus the user's filter choices
#[derive(Debug, Clone)]
pub struct PropertyListView {
    properties: Vec<PropertyRecord>,
    loading: bool,
    error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
    pub filter: FilterConfig,
}

impl Default for PropertyListView {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyListView {
    /// A fresh view starts out loading
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            loading: true,
            error: None,
            loaded_at: None,
            filter: FilterConfig::default(),
        }
    }

    pub fn properties(&self) -> &[PropertyRecord] {
        &self.properties
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Listings to display under the current filter
    pub fn filtered(&self) -> Vec<PropertyRecord> {
        filter::apply(&self.properties, &self.filter)
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    pub async fn load(&mut self, source: &dyn PropertySource) {
        self.begin();
        let result = source.list_properties().await;
        self.finish(result);
    }

    pub async fn reload(&mut self, source: &dyn PropertySource) {
        self.load(source).await;
    }

    /// Replaces the listings with the results of a server-side search
    pub async fn search(&mut self, source: &dyn PropertySource, term: &str) {
        self.begin();
        let result = source.global_search(term).await;
        self.finish(result);
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self, result: Result<Vec<PropertyRecord>, ApiError>) {
        match result {
            Ok(properties) => {
                info!("Property list holds {} records", properties.len());
                self.properties = properties;
                self.loaded_at = Some(Utc::now());
            }
            Err(err) => {
                warn!("Loading properties failed: {}", err);
                self.error = Some(err.user_message(LOAD_FAILED));
            }
        }
        self.loading = false;
    }
}

