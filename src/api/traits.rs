use crate::api::ApiError;
use crate::models::{ContactRequest, PropertyDetail, PropertyRecord};
use async_trait::async_trait;

/// Read side of the listing API.
/// Views depend on this rather than the HTTP client so they can be driven by fakes.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// All published listings
    async fn list_properties(&self) -> Result<Vec<PropertyRecord>, ApiError>;

    /// A single listing with its detail fields
    async fn property_by_id(&self, id: i64) -> Result<PropertyDetail, ApiError>;

    /// Free-text search across every listing; the term is trimmed before sending
    async fn global_search(&self, term: &str) -> Result<Vec<PropertyRecord>, ApiError>;
}

/// Receives buyer contact requests for a listing
#[async_trait]
pub trait ContactSink: Send + Sync {
    async fn add_buyer_contact(
        &self,
        property_id: i64,
        contact: &ContactRequest,
    ) -> Result<(), ApiError>;
}
