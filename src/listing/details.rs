use crate::api::PropertySource;
use crate::models::PropertyDetail;
use tracing::warn;

const INVALID_ID: &str = "Invalid property ID.";
const LOAD_FAILED: &str = "Failed to load property details. Please try again.";

/// State behind the property detail page
#[derive(Debug, Clone)]
pub struct PropertyDetailView {
    id: Option<i64>,
    property: Option<PropertyDetail>,
    loading: bool,
    error: Option<String>,
}

impl Default for PropertyDetailView {
    fn default() -> Self {
        Self {
            id: None,
            property: None,
            loading: true,
            error: None,
        }
    }
}

impl PropertyDetailView {
    pub fn property(&self) -> Option<&PropertyDetail> {
        self.property.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Opens the listing named by a raw route parameter.
    /// Zero, negative or non-numeric ids are rejected without a request.
    pub async fn open(&mut self, source: &dyn PropertySource, raw_id: &str) {
        match raw_id.trim().parse::<i64>() {
            Ok(id) if id > 0 => {
                self.id = Some(id);
                self.loading = true;
                self.error = None;
                self.fetch(source, id).await;
            }
            _ => {
                self.id = None;
                self.property = None;
                self.error = Some(INVALID_ID.to_string());
                self.loading = false;
            }
        }
    }

    pub async fn reload(&mut self, source: &dyn PropertySource) {
        match self.id {
            Some(id) => {
                self.loading = true;
                self.error = None;
                self.fetch(source, id).await;
            }
            None => {
                self.property = None;
                self.error = Some(INVALID_ID.to_string());
                self.loading = false;
            }
        }
    }

    async fn fetch(&mut self, source: &dyn PropertySource, id: i64) {
        match source.property_by_id(id).await {
            Ok(detail) => self.property = Some(detail),
            Err(err) => {
                warn!("Loading property {} failed: {}", id, err);
                self.property = None;
                self.error = Some(err.user_message(LOAD_FAILED));
            }
        }
        self.loading = false;
    }
}
