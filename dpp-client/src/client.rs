//! Tenant-scoped HTTP dispatcher
//!
//! Every outbound call runs in exactly one of two header lanes:
//!
//! - the **admin lane** (`x-admin-key`), a session-wide key installed at
//!   login and replaced atomically at login/logout;
//! - the **tenant lane** (`x-api-key`), whose key the caller passes on
//!   every call. The dispatcher never pulls a tenant key out of session
//!   state: a session may hold a brand and a supplier key at once, and
//!   only the call site knows which tenant a call targets.

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{ApiEnvelope, Payload};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Admin lane header
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";
/// Tenant lane header
pub const API_KEY_HEADER: &str = "x-api-key";

/// Which authorization lane a request runs in
pub(crate) enum Lane<'a> {
    /// Admin lane, key taken from the installed session key
    Session,
    /// Admin lane with an explicit candidate key (probing only);
    /// leaves the installed session key untouched
    AdminCandidate(&'a str),
    /// Tenant lane with a caller-supplied key
    Tenant(&'a str),
}

/// HTTP client for the DPP platform API
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    admin_key: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            admin_key: RwLock::new(None),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install or clear the admin lane key.
    ///
    /// Replaces the key for all subsequent admin-scoped calls at once;
    /// two admin keys are never active together.
    pub async fn set_admin_key(&self, key: Option<String>) {
        let mut lane = self.admin_key.write().await;
        match &key {
            Some(_) => debug!("admin lane configured"),
            None => debug!("admin lane cleared"),
        }
        *lane = key;
    }

    /// Whether the admin lane currently holds a key
    pub async fn has_admin_key(&self) -> bool {
        self.admin_key.read().await.is_some()
    }

    async fn send<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        lane: Lane<'_>,
    ) -> ClientResult<ApiEnvelope<T>> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut req = self.client.request(method, &url);
        match lane {
            Lane::Session => {
                if let Some(key) = self.admin_key.read().await.as_deref() {
                    req = req.header(ADMIN_KEY_HEADER, key);
                }
            }
            Lane::AdminCandidate(key) => {
                req = req.header(ADMIN_KEY_HEADER, key);
            }
            Lane::Tenant(key) => {
                req = req.header(API_KEY_HEADER, key);
            }
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let response = req.send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<ApiEnvelope<T>> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // Prefer the envelope's error message when one is present
            let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&text)
                .ok()
                .and_then(|env| env.error)
                .unwrap_or(text);
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(message)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(message)),
                _ => Err(ClientError::Internal(message)),
            };
        }
        Ok(response.json().await?)
    }

    fn expect_data<T>(envelope: ApiEnvelope<T>) -> ClientResult<Payload<T>> {
        if let Some(error) = envelope.error {
            return Err(ClientError::Api(error));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("missing data field".into()))
    }

    /// GET in the admin lane with an explicit candidate key (prober only)
    pub(crate) async fn get_as_admin_candidate<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
    ) -> ClientResult<Payload<T>> {
        let envelope = self
            .send(Method::GET, path, None::<&()>, Lane::AdminCandidate(key))
            .await?;
        Self::expect_data(envelope)
    }

    /// GET. Tenant lane when `tenant_key` is given, admin lane otherwise.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        tenant_key: Option<&str>,
    ) -> ClientResult<Payload<T>> {
        let envelope = self
            .send(Method::GET, path, None::<&()>, Self::lane(tenant_key))
            .await?;
        Self::expect_data(envelope)
    }

    /// POST a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        tenant_key: Option<&str>,
    ) -> ClientResult<Payload<T>> {
        let envelope = self
            .send(Method::POST, path, Some(body), Self::lane(tenant_key))
            .await?;
        Self::expect_data(envelope)
    }

    /// PUT a JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        tenant_key: Option<&str>,
    ) -> ClientResult<Payload<T>> {
        let envelope = self
            .send(Method::PUT, path, Some(body), Self::lane(tenant_key))
            .await?;
        Self::expect_data(envelope)
    }

    /// DELETE. Tolerates an empty envelope: deletions often answer with
    /// no `data` at all.
    pub async fn delete(&self, path: &str, tenant_key: Option<&str>) -> ClientResult<()> {
        let envelope: ApiEnvelope<serde_json::Value> = self
            .send(Method::DELETE, path, None::<&()>, Self::lane(tenant_key))
            .await?;
        if let Some(error) = envelope.error {
            return Err(ClientError::Api(error));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Absent-result surface for view models: failures come back as None
    // and are logged here, so call sites render "nothing loaded" instead
    // of crashing.
    // ------------------------------------------------------------------

    /// GET, absent on failure
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        tenant_key: Option<&str>,
    ) -> Option<Payload<T>> {
        match self.get(path, tenant_key).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(path, error = %e, "fetch failed");
                None
            }
        }
    }

    /// POST, absent on failure
    pub async fn create<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        tenant_key: Option<&str>,
    ) -> Option<Payload<T>> {
        match self.post(path, body, tenant_key).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(path, error = %e, "create failed");
                None
            }
        }
    }

    /// PUT, absent on failure
    pub async fn replace<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        tenant_key: Option<&str>,
    ) -> Option<Payload<T>> {
        match self.put(path, body, tenant_key).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(path, error = %e, "replace failed");
                None
            }
        }
    }

    /// DELETE, absent on failure
    pub async fn remove(&self, path: &str, tenant_key: Option<&str>) -> Option<()> {
        match self.delete(path, tenant_key).await {
            Ok(()) => Some(()),
            Err(e) => {
                warn!(path, error = %e, "remove failed");
                None
            }
        }
    }

    fn lane(tenant_key: Option<&str>) -> Lane<'_> {
        match tenant_key {
            Some(key) => Lane::Tenant(key),
            None => Lane::Session,
        }
    }
}
