//! Form resource operations: list (with pagination), download and upload

use crate::api::client::FormsClient;
use crate::api::constants::{form_path, forms_path};
use crate::api::error::{ApiError, FormOperation};
use crate::api::manager::ClientManager;
use crate::api::models::{EnvironmentCredential, FormSummary, FormsPage};
use log::{debug, info};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Form operations against one environment, sharing one authenticated client
pub struct FormsApi {
    client: FormsClient,
    tenant_id: String,
}

impl FormsApi {
    pub fn new(client: FormsClient, tenant_id: impl Into<String>) -> Self {
        Self {
            client,
            tenant_id: tenant_id.into(),
        }
    }

    /// Authenticate and bind to the credential's environment
    pub async fn connect(
        manager: &ClientManager,
        credential: &EnvironmentCredential,
    ) -> Result<Self, ApiError> {
        let client = manager.create_client(credential).await?;
        Ok(Self::new(client, credential.tenant_id.clone()))
    }

    pub fn env_name(&self) -> &str {
        self.client.env_name()
    }

    /// List every form in the environment, following `next` links until the
    /// last page, sorted by name.
    pub async fn list_forms(&self) -> Result<Vec<FormSummary>, ApiError> {
        let operation = FormOperation::List;
        let mut forms = Vec::new();
        let mut next = Some(forms_path(&self.tenant_id));
        let mut visited = HashSet::new();
        let mut pages = 0;

        while let Some(path) = next.take() {
            if !visited.insert(path.clone()) {
                return Err(ApiError::InvalidResponse {
                    env: self.env_name().to_string(),
                    operation,
                    message: format!("pagination loops back to {}", path),
                });
            }

            let body = self.fetch(operation, &path, None, None).await?;
            let page: FormsPage =
                serde_json::from_value(body).map_err(|e| ApiError::InvalidResponse {
                    env: self.env_name().to_string(),
                    operation,
                    message: e.to_string(),
                })?;

            pages += 1;
            debug!(
                "[{}] Page {} returned {} forms",
                self.env_name(),
                pages,
                page.embedded.forms.len()
            );
            forms.extend(page.embedded.forms);
            next = page.links.next.map(|link| self.client.relative_path(&link.href));
        }

        sort_forms(&mut forms);
        info!(
            "[{}] Listed {} forms across {} pages",
            self.env_name(),
            forms.len(),
            pages
        );
        Ok(forms)
    }

    /// Fetch the full JSON definition of one form, unmodified
    pub async fn download_form(&self, form_id: &str) -> Result<Value, ApiError> {
        let path = form_path(&self.tenant_id, form_id);
        self.fetch(FormOperation::Download, &path, None, Some(form_id)).await
    }

    /// Create a form from a payload and return the platform's response
    pub async fn upload_form(&self, payload: &Value) -> Result<Value, ApiError> {
        let path = forms_path(&self.tenant_id);
        self.fetch(FormOperation::Upload, &path, Some(payload), None).await
    }

    async fn fetch(
        &self,
        operation: FormOperation,
        path: &str,
        body: Option<&Value>,
        form_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        let env = self.env_name();
        let network_error = |source| ApiError::Network {
            env: env.to_string(),
            operation,
            source,
        };

        let response = match body {
            Some(body) => self.client.post(path, body).await,
            None => self.client.get(path).await,
        }
        .map_err(network_error)?;

        let status = response.status();
        let text = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            return Err(ApiError::from_status(env, operation, status.as_u16(), &text, form_id));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse {
            env: env.to_string(),
            operation,
            message: format!("invalid JSON: {}", e),
        })
    }
}

impl ClientManager {
    /// List all forms of an environment, sorted by name
    pub async fn list_forms(
        &self,
        credential: &EnvironmentCredential,
    ) -> Result<Vec<FormSummary>, ApiError> {
        FormsApi::connect(self, credential).await?.list_forms().await
    }

    /// Download one form definition
    pub async fn download_form(
        &self,
        credential: &EnvironmentCredential,
        form_id: &str,
    ) -> Result<Value, ApiError> {
        FormsApi::connect(self, credential).await?.download_form(form_id).await
    }

    /// Create a form in an environment
    pub async fn upload_form(
        &self,
        credential: &EnvironmentCredential,
        payload: &Value,
    ) -> Result<Value, ApiError> {
        FormsApi::connect(self, credential).await?.upload_form(payload).await
    }
}

/// Name order used for listings: case-insensitive, lowercase first on ties
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

pub fn sort_forms(forms: &mut [FormSummary]) {
    forms.sort_by(|a, b| compare_names(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resilience::{RetryConfig, RetryPolicy};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TENANT: &str = "t-1";

    fn summary(id: &str, name: &str) -> FormSummary {
        FormSummary {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
        }
    }

    fn api(server: &MockServer) -> FormsApi {
        let client = FormsClient::new(
            "Dev US".to_string(),
            format!("{}/v1", server.uri()),
            "token".to_string(),
            RetryPolicy::new(RetryConfig::disabled()),
            Duration::from_secs(5),
        )
        .unwrap();
        FormsApi::new(client, TENANT)
    }

    #[test]
    fn test_sort_forms() {
        let mut forms = vec![
            summary("1", "beta"),
            summary("2", "Alpha"),
            summary("3", "alpha"),
            summary("4", "Gamma"),
        ];
        sort_forms(&mut forms);

        let names: Vec<&str> = forms.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Alpha", "beta", "Gamma"]);
    }

    #[tokio::test]
    async fn test_list_follows_pages_with_mixed_links() {
        let server = MockServer::start().await;
        let base = format!("{}/v1", server.uri());

        Mock::given(method("GET"))
            .and(path("/v1/environments/t-1/forms"))
            .and(query_param("cursor", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": { "forms": [
                    { "id": "c", "name": "Charlie" },
                    { "id": "a", "name": "alpha" }
                ]},
                "_links": { "next": { "href": "/v1/environments/t-1/forms?cursor=3" } }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/environments/t-1/forms"))
            .and(query_param("cursor", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": { "forms": [ { "id": "b", "name": "Bravo", "description": "second" } ]},
                "_links": {}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/environments/t-1/forms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": { "forms": [
                    { "id": "e", "name": "echo" },
                    { "id": "d", "name": "Delta" }
                ]},
                "_links": { "next": { "href": format!("{}/environments/t-1/forms?cursor=2", base) } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let forms = api(&server).list_forms().await.unwrap();

        let ids: Vec<&str> = forms.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(forms[1].description.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_list_detects_pagination_loop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": { "forms": [] },
                "_links": { "next": { "href": "/v1/environments/t-1/forms" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let error = api(&server).list_forms().await.unwrap_err();
        assert!(matches!(error, ApiError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_download_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/environments/t-1/forms/f-1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "NOT_FOUND",
                "message": "The requested resource was not found."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let error = api(&server).download_form("f-1").await.unwrap_err();
        let message = error.to_string();
        assert!(message.contains("f-1"));
        assert!(message.contains("Dev US"));
    }

    #[tokio::test]
    async fn test_download_returns_payload_unmodified() {
        let server = MockServer::start().await;
        let payload = json!({
            "id": "f-1",
            "name": "Login",
            "environment": { "id": "t-1" },
            "components": { "fields": [ { "type": "TEXT" } ] },
            "_links": { "self": { "href": "x" } }
        });
        Mock::given(method("GET"))
            .and(path("/v1/environments/t-1/forms/f-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .mount(&server)
            .await;

        assert_eq!(api(&server).download_form("f-1").await.unwrap(), payload);
    }

    #[tokio::test]
    async fn test_upload_errors() {
        let cases = [
            (400, "Form payload rejected: name too long"),
            (409, "already exists"),
            (401, "expired or invalid while trying to upload form"),
            (403, "Insufficient permissions to upload form"),
            (502, "Failed to upload form (HTTP 502)"),
        ];

        for (status, expected) in cases {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/v1/environments/t-1/forms"))
                .respond_with(
                    ResponseTemplate::new(status).set_body_json(json!({ "message": "name too long" })),
                )
                .expect(1)
                .mount(&server)
                .await;

            let error = api(&server).upload_form(&json!({ "name": "x" })).await.unwrap_err();
            let message = error.to_string();
            assert!(message.contains(expected), "{status}: {message}");
            assert!(message.contains("Dev US"), "{message}");
        }
    }

    #[tokio::test]
    async fn test_upload_returns_created_resource() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/environments/t-1/forms"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "new-1", "name": "x" })))
            .mount(&server)
            .await;

        let created = api(&server).upload_form(&json!({ "name": "x" })).await.unwrap();
        assert_eq!(created["id"], "new-1");
    }

    #[tokio::test]
    async fn test_network_error_names_operation() {
        let client = FormsClient::new(
            "Offline".to_string(),
            "http://127.0.0.1:1/v1".to_string(),
            "token".to_string(),
            RetryPolicy::new(RetryConfig::disabled()),
            Duration::from_secs(2),
        )
        .unwrap();
        let api = FormsApi::new(client, TENANT);

        let error = api.list_forms().await.unwrap_err();
        assert!(matches!(error, ApiError::Network { operation: FormOperation::List, .. }));
        assert!(error.to_string().contains("Offline"));
    }
}
