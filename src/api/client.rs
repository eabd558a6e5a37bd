//! reqwest client for the business backend

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::config::{Config, Session};
use crate::models::{
    Category, EntityDraft, EntityKind, EntityRecord, ListEnvelope, Location, QueryKey, Supplier,
};

/// Operations the dashboard needs from the backend
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Fetch every record matching the key
    async fn fetch_list(&self, key: &QueryKey) -> Result<Vec<EntityRecord>, ApiError>;

    /// Submit a create request
    async fn create(&self, draft: &EntityDraft) -> Result<(), ApiError>;
}

/// HTTP implementation of [`RemoteApi`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            session: config.session.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with the session token attached
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");

        match &self.session.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn fetch_list(&self, key: &QueryKey) -> Result<Vec<EntityRecord>, ApiError> {
        debug!(
            "GET {}{} business_id={} per_page={}",
            self.base_url,
            key.kind.list_path(),
            key.business_id,
            key.per_page.as_param()
        );

        let response = self
            .request(Method::GET, key.kind.list_path())
            .query(&[
                ("business_id", key.business_id),
                ("per_page", key.per_page.as_param()),
            ])
            .send()
            .await?;

        let body = checked_body(response).await?;
        let records = decode_list(key.kind, &body)?;
        info!("Fetched {} {} records", records.len(), key.kind.as_str());
        Ok(records)
    }

    async fn create(&self, draft: &EntityDraft) -> Result<(), ApiError> {
        debug!("POST {}{}", self.base_url, draft.create_path());

        let response = self
            .request(Method::POST, draft.create_path())
            .json(draft)
            .send()
            .await?;

        checked_body(response).await?;
        info!("Created record via {}", draft.create_path());
        Ok(())
    }
}

/// Read the body, turning non-success statuses into [`ApiError::Http`]
async fn checked_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Backend answered {}: {}", status, body);
        return Err(ApiError::Http {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

/// Decode a `{ data: [...] }` list body for the given entity kind.
///
/// A missing or null `data` field is an empty list. Category and role lists
/// are re-sorted by descending id.
pub fn decode_list(kind: EntityKind, body: &str) -> Result<Vec<EntityRecord>, ApiError> {
    let mut records = match kind {
        EntityKind::Category | EntityKind::Role => {
            parse_envelope::<Category>(kind, body)?
                .into_iter()
                .map(EntityRecord::Category)
                .collect::<Vec<_>>()
        }
        EntityKind::Location => parse_envelope::<Location>(kind, body)?
            .into_iter()
            .map(EntityRecord::Location)
            .collect(),
        EntityKind::Supplier => parse_envelope::<Supplier>(kind, body)?
            .into_iter()
            .map(EntityRecord::Supplier)
            .collect(),
    };

    if kind.sorts_desc_by_id() {
        records.sort_by(|a, b| b.id().cmp(&a.id()));
    }

    Ok(records)
}

fn parse_envelope<T: DeserializeOwned>(kind: EntityKind, body: &str) -> Result<Vec<T>, ApiError> {
    let envelope: ListEnvelope<T> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode {
            entity: kind.as_str().to_string(),
            message: e.to_string(),
        })?;
    Ok(envelope.data.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_sorted_newest_first() {
        let body = r#"{
            "data": [
                {"id": 3, "name": "Snacks", "business_id": 7, "parent_id": null, "created_by": 1,
                 "created_at": "2024-01-03T00:00:00Z", "updated_at": "2024-01-03T00:00:00Z"},
                {"id": 11, "name": "Drinks", "business_id": 7, "parent_id": 3, "created_by": 1,
                 "created_at": "2024-02-01T00:00:00Z", "updated_at": "2024-02-01T00:00:00Z"},
                {"id": 5, "name": "Desserts", "business_id": 7, "created_by": 2}
            ]
        }"#;

        let records = decode_list(EntityKind::Category, body).unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![11, 5, 3]);
    }

    #[test]
    fn test_roles_decode_as_categories() {
        let body = r#"{"data": [{"id": 1, "name": "Manager", "business_id": 7},
                                {"id": 2, "name": "Cashier", "business_id": 7}]}"#;
        let records = decode_list(EntityKind::Role, body).unwrap();
        assert!(matches!(records[0], EntityRecord::Category(ref c) if c.name == "Cashier"));
    }

    #[test]
    fn test_locations_keep_backend_order() {
        let body = r#"{"data": [
            {"id": 1, "name": "Main", "landmark": "Mall", "location_id": "LOC-1", "business_id": 7,
             "city": "Lahore", "state": "Punjab", "country": "PK"},
            {"id": 9, "name": "Harbour", "landmark": "Port", "location_id": "LOC-9", "business_id": 7,
             "city": "Karachi", "state": "Sindh", "country": "PK"}
        ]}"#;
        let records = decode_list(EntityKind::Location, body).unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![1, 9]);
    }

    #[test]
    fn test_missing_data_is_empty_list() {
        assert!(decode_list(EntityKind::Supplier, "{}").unwrap().is_empty());
        assert!(decode_list(EntityKind::Category, r#"{"data": null}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = decode_list(EntityKind::Supplier, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref entity, .. } if entity == "supplier"));
    }

    #[test]
    fn test_client_trims_base_url() {
        let config = Config::default().with_overrides(
            Some("http://localhost:9000/api/".to_string()),
            Some(1),
            Some("secret".to_string()),
        );
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/api");
    }

    #[test]
    fn test_request_carries_accept_and_bearer_token() {
        let config = Config::default().with_overrides(None, Some(1), Some("secret".to_string()));
        let client = ApiClient::new(&config).unwrap();
        let request = client
            .request(Method::GET, EntityKind::Category.list_path())
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://demo.onlineorder.dev-logix.com/api/categories"
        );
        assert_eq!(request.headers()[ACCEPT], "application/json");
        assert_eq!(request.headers()["authorization"], "Bearer secret");
    }
}
