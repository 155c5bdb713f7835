use crate::api::traits::{ContactSink, PropertySource};
use crate::api::ApiError;
use crate::config::ApiConfig;
use crate::models::{BuyerContact, ContactRequest, PropertyDetail, PropertyRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Thin JSON client over the listing API.
/// Endpoints are given relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("estate-pilot/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let request = self.client.get(self.url(endpoint)).query(query);
        self.send_json(endpoint, request).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.url(endpoint)).json(body);
        self.send_json(endpoint, request).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.put(self.url(endpoint)).json(body);
        self.send_json(endpoint, request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let request = self.client.delete(self.url(endpoint));
        self.send_json(endpoint, request).await
    }

    /// Sends a request whose response body is ignored
    pub async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self.client.request(method, self.url(endpoint)).json(body);
        self.send(endpoint, request).await.map(|_| ())
    }

    async fn send(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        debug!("Requesting {}", endpoint);

        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned status: {}", endpoint, status);
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        self.send(endpoint, request)
            .await?
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

#[async_trait]
impl PropertySource for ApiClient {
    async fn list_properties(&self) -> Result<Vec<PropertyRecord>, ApiError> {
        let properties: Vec<PropertyRecord> = self.get("property/GetAllProperties", &[]).await?;
        info!("Fetched {} properties", properties.len());
        Ok(properties)
    }

    async fn property_by_id(&self, id: i64) -> Result<PropertyDetail, ApiError> {
        self.get(&format!("property/GetPropertyById/{}", id), &[])
            .await
    }

    async fn global_search(&self, term: &str) -> Result<Vec<PropertyRecord>, ApiError> {
        let term = term.trim();
        let results: Vec<PropertyRecord> = self
            .get("property/GlobalSearch", &[("term", term)])
            .await?;
        info!("Global search '{}' matched {} properties", term, results.len());
        Ok(results)
    }
}

#[async_trait]
impl ContactSink for ApiClient {
    async fn add_buyer_contact(
        &self,
        property_id: i64,
        contact: &ContactRequest,
    ) -> Result<(), ApiError> {
        let body = BuyerContact {
            property_id,
            contact,
        };
        self.send_unit(Method::POST, "contact/addBuyerContact", &body)
            .await?;
        info!("Submitted buyer contact for property {}", property_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn joins_endpoints_onto_base_url() {
        let client = ApiClient::new(&config("http://localhost:5000/api/")).expect("client builds");
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(
            client.url("/property/GetAllProperties"),
            "http://localhost:5000/api/property/GetAllProperties"
        );
        assert_eq!(
            client.url("contact/addBuyerContact"),
            "http://localhost:5000/api/contact/addBuyerContact"
        );
    }
}
