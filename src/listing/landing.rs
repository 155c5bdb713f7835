use crate::api::PropertySource;
use crate::models::PropertyRecord;
use tracing::{info, warn};

/// How many listings the landing page features
pub const FEATURED_COUNT: usize = 3;

const LOAD_FAILED: &str = "Failed to load properties.";

/// Featured listings block on the landing page
#[derive(Debug, Clone)]
pub struct LandingView {
    properties: Vec<PropertyRecord>,
    loading: bool,
    error: Option<String>,
}

impl Default for LandingView {
    fn default() -> Self {
        Self {
            properties: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl LandingView {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Every listing fetched for the page
    pub fn properties(&self) -> &[PropertyRecord] {
        &self.properties
    }

    /// The first few listings in API order
    pub fn featured_preview(&self) -> &[PropertyRecord] {
        &self.properties[..self.properties.len().min(FEATURED_COUNT)]
    }

    pub async fn load(&mut self, source: &dyn PropertySource) {
        self.loading = true;
        self.error = None;
        match source.list_properties().await {
            Ok(properties) => {
                info!(
                    "Landing page featuring {} of {} properties",
                    properties.len().min(FEATURED_COUNT),
                    properties.len()
                );
                self.properties = properties;
            }
            Err(err) => {
                warn!("Loading featured properties failed: {}", err);
                self.properties.clear();
                self.error = Some(err.user_message(LOAD_FAILED));
            }
        }
        self.loading = false;
    }
}
