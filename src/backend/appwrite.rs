use crate::backend::{ListOptions, RecipeBackend};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::mapper::RawRecord;
use crate::model::{NewAccount, User};
use async_trait::async_trait;
use config::ConfigError;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Lets the service assign the id
const UNIQUE_ID: &str = "unique()";

/// Talks to the Appwrite REST API. The session cookie set on login is kept in
/// the client's cookie store, so one instance represents one browsing session.
pub struct AppwriteBackend {
    client: Client,
    endpoint: String,
    documents: Url,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<RawRecord>,
}

impl AppwriteBackend {
    /// Create a backend from configuration
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-appwrite-project",
            HeaderValue::from_str(&config.project_id)?,
        );

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        let documents = Url::parse(&format!(
            "{}/databases/{}/collections/{}/documents",
            endpoint, config.database_id, config.recipes_collection_id
        ))
        .map_err(|e| invalid_endpoint(&endpoint, &e.to_string()))?;
        if documents.cannot_be_a_base() {
            return Err(invalid_endpoint(&endpoint, "not a base URL"));
        }

        Ok(AppwriteBackend {
            client,
            endpoint,
            documents,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn documents_url(&self) -> Url {
        self.documents.clone()
    }

    /// URL of a single document, with the id encoded as one path segment
    fn document_url(&self, id: &str) -> Url {
        let mut url = self.documents.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    async fn current_user(&self) -> Result<User, AppError> {
        let response = self.client.get(self.url("/account")).send().await?;
        decode(check_status(response).await?).await
    }
}

fn invalid_endpoint(endpoint: &str, reason: &str) -> AppError {
    AppError::Config(ConfigError::Message(format!(
        "Invalid endpoint {}: {}",
        endpoint, reason
    )))
}

/// Build [`AppError::Service`] from an error response, using the message from the body when present
async fn service_error(response: Response) -> AppError {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    debug!("Appwrite error response ({}): {:?}", status, body);
    let message = body["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());

    AppError::Service {
        code: status.as_u16(),
        message,
    }
}

/// Pass successful responses through; 401 becomes [`AppError::Unauthorized`]
async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        debug!("Appwrite rejected the request as unauthenticated");
        return Err(AppError::Unauthorized);
    }
    Err(service_error(response).await)
}

/// Decode a JSON body, reporting payloads of the wrong shape as [`AppError::InvalidResponse`]
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| AppError::InvalidResponse(e.to_string()))
}

fn list_queries(options: &ListOptions) -> Vec<(&'static str, String)> {
    vec![
        (
            "queries[]",
            json!({"method": "orderDesc", "attribute": "$createdAt"}).to_string(),
        ),
        (
            "queries[]",
            json!({"method": "limit", "values": [options.limit]}).to_string(),
        ),
    ]
}

#[async_trait]
impl RecipeBackend for AppwriteBackend {
    fn backend_name(&self) -> &str {
        "appwrite"
    }

    async fn current_session(&self) -> Result<User, AppError> {
        self.current_user().await
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let response = self
            .client
            .post(self.url("/account/sessions/email"))
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await?;
        // A 401 here means bad credentials, so keep the service's message
        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        self.current_user().await
    }

    async fn signup(&self, account: &NewAccount) -> Result<User, AppError> {
        let response = self
            .client
            .post(self.url("/account"))
            .json(&json!({
                "userId": UNIQUE_ID,
                "email": account.email,
                "password": account.password,
                "name": account.name
            }))
            .send()
            .await?;

        decode(check_status(response).await?).await
    }

    async fn logout(&self) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.url("/account/sessions/current"))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn fetch_collection(&self, options: &ListOptions) -> Result<Vec<RawRecord>, AppError> {
        let response = self
            .client
            .get(self.documents_url())
            .query(&list_queries(options))
            .send()
            .await?;

        let list: DocumentList = decode(check_status(response).await?).await?;
        debug!("Fetched {} recipe documents", list.documents.len());
        Ok(list.documents)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<RawRecord, AppError> {
        // Dot segments would be dropped from the path and hit the collection itself
        if matches!(id, "" | "." | "..") {
            return Err(AppError::NotFound(id.to_string()));
        }

        let response = self.client.get(self.document_url(id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(id.to_string()));
        }
        decode(check_status(response).await?).await
    }

    async fn create_record(&self, fields: Map<String, Value>) -> Result<RawRecord, AppError> {
        let response = self
            .client
            .post(self.documents_url())
            .json(&json!({
                "documentId": UNIQUE_ID,
                "data": fields
            }))
            .send()
            .await?;

        let record: RawRecord = decode(check_status(response).await?).await?;
        debug!("Created recipe document {}", record.id);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(endpoint: &str) -> AppConfig {
        AppConfig {
            endpoint: endpoint.to_string(),
            project_id: "savory".to_string(),
            database_id: "main".to_string(),
            recipes_collection_id: "recipes".to_string(),
            timeout: 5,
            list_limit: 20,
            featured_limit: 4,
        }
    }

    #[test]
    fn test_backend_name() {
        let backend = AppwriteBackend::new(&test_config("https://cloud.appwrite.io/v1")).unwrap();
        assert_eq!(backend.backend_name(), "appwrite");
    }

    #[test]
    fn test_documents_url_ignores_trailing_slash() {
        let backend = AppwriteBackend::new(&test_config("https://cloud.appwrite.io/v1/")).unwrap();
        assert_eq!(
            backend.documents_url().as_str(),
            "https://cloud.appwrite.io/v1/databases/main/collections/recipes/documents"
        );
    }

    #[test]
    fn test_document_url_encodes_id_as_one_segment() {
        let backend = AppwriteBackend::new(&test_config("https://cloud.appwrite.io/v1")).unwrap();
        assert_eq!(
            backend.document_url("pie").as_str(),
            "https://cloud.appwrite.io/v1/databases/main/collections/recipes/documents/pie"
        );
        assert_eq!(
            backend.document_url("../x?y").as_str(),
            "https://cloud.appwrite.io/v1/databases/main/collections/recipes/documents/..%2Fx%3Fy"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            AppwriteBackend::new(&test_config("not a url")),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_list_queries() {
        let queries = list_queries(&ListOptions::newest(4));
        assert_eq!(queries.len(), 2);
        let order: Value = serde_json::from_str(&queries[0].1).unwrap();
        assert_eq!(order["method"], "orderDesc");
        assert_eq!(order["attribute"], "$createdAt");
        let limit: Value = serde_json::from_str(&queries[1].1).unwrap();
        assert_eq!(limit["values"][0], 4);
    }

    #[test]
    fn test_invalid_project_header() {
        let mut config = test_config("https://cloud.appwrite.io/v1");
        config.project_id = "bad\nid".to_string();
        assert!(matches!(
            AppwriteBackend::new(&config),
            Err(AppError::HeaderError(_))
        ));
    }
}
