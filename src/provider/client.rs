use super::{Identity, IdentityProvider, ProviderError};
use crate::{cli::globals::GlobalArgs, APP_USER_AGENT};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, info_span, Instrument};
use url::Url;

const HEADER_PROJECT: &str = "X-Appwrite-Project";
const HEADER_KEY: &str = "X-Appwrite-Key";

/// HTTP client for the provider's account and database APIs.
#[derive(Clone)]
pub struct ProviderClient {
    http: Client,
    endpoint: String,
    project_id: String,
    api_key: SecretString,
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &"***")
            .finish_non_exhaustive()
    }
}

impl ProviderClient {
    /// Build a client from the provider settings.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not an http(s) URL or the HTTP client cannot be built.
    pub fn new(globals: &GlobalArgs) -> Result<Self> {
        let endpoint = Url::parse(&globals.provider_endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", globals.provider_endpoint))?;

        match endpoint.scheme() {
            "http" | "https" => (),
            scheme => return Err(anyhow!("Unsupported provider endpoint scheme: {scheme}")),
        }

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(globals.provider_timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: globals.provider_endpoint.trim_end_matches('/').to_string(),
            project_id: globals.provider_project_id.clone(),
            api_key: globals.provider_api_key.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(HEADER_PROJECT, &self.project_id)
            .header(HEADER_KEY, self.api_key.expose_secret())
    }
}

/// Read a provider response, turning non-2xx statuses into [`ProviderError::Rejected`].
pub(crate) async fn expect_success(response: Response) -> Result<Value, ProviderError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let body = serde_json::from_slice::<Value>(&bytes);

    if !status.is_success() {
        return Err(ProviderError::rejected(status, &body.unwrap_or(Value::Null)));
    }

    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    body.map_err(|err| ProviderError::InvalidResponse(err.to_string()))
}

fn parse_identity(body: &Value) -> Result<Identity, ProviderError> {
    let id = body
        .get("$id")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::InvalidResponse("no $id found".to_string()))?;

    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(Identity {
        id: id.to_string(),
        email: field("email"),
        name: field("name"),
    })
}

#[async_trait]
impl IdentityProvider for ProviderClient {
    async fn create_identity(
        &self,
        identity_id: &str,
        email: &str,
        secret: &SecretString,
        display_name: &str,
    ) -> Result<Identity, ProviderError> {
        let payload = json!({
            "userId": identity_id,
            "email": email,
            "password": secret.expose_secret(),
            "name": display_name,
        });

        let span = info_span!(
            "provider.create_identity",
            http.method = "POST",
            url = %self.url("/account")
        );
        let response = self
            .request(Method::POST, "/account")
            .json(&payload)
            .send()
            .instrument(span)
            .await?;

        match expect_success(response).await {
            Ok(body) => parse_identity(&body),
            Err(ProviderError::Rejected { status, message })
                if status == StatusCode::CONFLICT || message.contains("already exists") =>
            {
                debug!("identity already exists: {message}");
                Err(ProviderError::AlreadyExists)
            }
            Err(err) => Err(err),
        }
    }

    async fn create_verification(&self, redirect_url: &Url) -> Result<(), ProviderError> {
        let span = info_span!(
            "provider.create_verification",
            http.method = "POST",
            url = %self.url("/account/verification")
        );
        let response = self
            .request(Method::POST, "/account/verification")
            .json(&json!({ "url": redirect_url.as_str() }))
            .send()
            .instrument(span)
            .await?;

        expect_success(response).await.map(|_| ())
    }

    async fn confirm_verification(
        &self,
        user_id: &str,
        secret: &str,
    ) -> Result<(), ProviderError> {
        let span = info_span!(
            "provider.confirm_verification",
            http.method = "PUT",
            url = %self.url("/account/verification")
        );
        let response = self
            .request(Method::PUT, "/account/verification")
            .json(&json!({ "userId": user_id, "secret": secret }))
            .send()
            .instrument(span)
            .await?;

        expect_success(response).await.map(|_| ())
    }

    async fn health(&self) -> Result<(), ProviderError> {
        let span = info_span!(
            "provider.health",
            http.method = "GET",
            url = %self.url("/health/version")
        );
        let response = self
            .request(Method::GET, "/health/version")
            .send()
            .instrument(span)
            .await?;

        expect_success(response).await.map(|_| ())
    }
}
