use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder, Response};
use gloo::storage::{LocalStorage, Storage};
use serde::Deserialize;
use uuid::Uuid;
use wellpath_core::api::{
    decode_page, ApiError, CatalogQuery, Page, ProgressApi, ProgressQuery, RegisterChallenge,
    UpdateStepStatus, CATALOG_PATH, IDEMPOTENCY_HEADER, PROGRESS_PATH, REGISTER_PATH,
};
use wellpath_core::domain::{Challenge, ChallengeProgress};
use wellpath_core::ApiConfig;

/// Local storage key holding the signed-in user's access token
pub const TOKEN_STORAGE_KEY: &str = "wellpath.access_token";

/// `ProgressApi` over the browser's `fetch`
#[derive(Debug, Clone)]
pub struct HttpProgressApi {
    config: ApiConfig,
    token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Human-readable reason from an error response body
fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.title) {
            return message;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        format!("request failed with status {status}")
    } else {
        body.to_string()
    }
}

fn transport(err: gloo::net::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

async fn check(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status, url = %response.url(), "backend returned an error");
    Err(ApiError::http(status, error_message(status, &body)))
}

impl HttpProgressApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            token: None,
        }
    }

    /// Pick up the access token left in local storage by the sign-in flow
    pub fn from_storage(config: ApiConfig) -> Self {
        let token = LocalStorage::get::<String>(TOKEN_STORAGE_KEY).ok();
        if token.is_none() {
            tracing::warn!("no access token found, requests will be anonymous");
        }
        Self { config, token }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn get_page<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        pairs: Vec<(&'static str, String)>,
    ) -> Result<Page<T>, ApiError> {
        let response = self
            .authorize(Request::get(&self.config.url(path)))
            .query(pairs)
            .send()
            .await
            .map_err(transport)?;
        let body: serde_json::Value = check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        decode_page(body)
    }
}

#[async_trait(?Send)]
impl ProgressApi for HttpProgressApi {
    async fn fetch_progresses(
        &self,
        query: &ProgressQuery,
    ) -> Result<Page<ChallengeProgress>, ApiError> {
        self.get_page(PROGRESS_PATH, query.to_pairs()).await
    }

    async fn update_step_status(&self, request: &UpdateStepStatus) -> Result<(), ApiError> {
        let response = self
            .authorize(Request::put(&self.config.url(PROGRESS_PATH)))
            .json(request)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }

    async fn register_challenge(
        &self,
        request: &RegisterChallenge,
        idempotency_key: Uuid,
    ) -> Result<(), ApiError> {
        let response = self
            .authorize(Request::post(&self.config.url(REGISTER_PATH)))
            .header(IDEMPOTENCY_HEADER, &idempotency_key.to_string())
            .json(request)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }

    async fn fetch_challenges(&self, query: &CatalogQuery) -> Result<Page<Challenge>, ApiError> {
        self.get_page(CATALOG_PATH, query.to_pairs()).await
    }
}
