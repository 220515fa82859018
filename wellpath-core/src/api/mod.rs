//! Boundary to the challenge backend.
//!
//! [`ProgressApi`] is the only way the application layer reaches the network.
//! The browser crate implements it over `fetch`; [`InMemoryProgressApi`]
//! backs tests.

mod memory;

pub use memory::InMemoryProgressApi;

use crate::domain::{
    Challenge, ChallengeId, ChallengeProgress, ChallengeType, ImprovementTag, ProcessStatus,
    ProgressId, StepId, StepStatus,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// List (GET) and update (PUT) the current user's challenge progress
pub const PROGRESS_PATH: &str = "/v1/me/challenge-progress";

/// Register (POST) for a challenge
pub const REGISTER_PATH: &str = "/v1/me/challenge-progresses";

/// Challenge catalog (GET)
pub const CATALOG_PATH: &str = "/v1/challenges";

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Errors crossing the API boundary
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    /// HTTP status, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Paging parameters rejected before a request is built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("page index must be at least 1 (got {0})")]
    InvalidPage(u32),

    #[error("page size must be greater than 0")]
    InvalidPageSize,
}

fn check_paging(page_index: u32, page_size: u32) -> Result<(), QueryError> {
    if page_index < 1 {
        return Err(QueryError::InvalidPage(page_index));
    }
    if page_size == 0 {
        return Err(QueryError::InvalidPageSize);
    }
    Ok(())
}

/// Query for `GET /v1/me/challenge-progress`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressQuery {
    pub process_status: Option<ProcessStatus>,
    pub challenge_type: Option<ChallengeType>,
    page_index: u32,
    page_size: u32,
    pub target_lang: String,
}

impl ProgressQuery {
    pub fn new(
        process_status: Option<ProcessStatus>,
        challenge_type: Option<ChallengeType>,
        page_index: u32,
        page_size: u32,
        target_lang: impl Into<String>,
    ) -> Result<Self, QueryError> {
        check_paging(page_index, page_size)?;
        Ok(Self {
            process_status,
            challenge_type,
            page_index,
            page_size,
            target_lang: target_lang.into(),
        })
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Query string pairs, in wire naming
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        if let Some(status) = self.process_status {
            pairs.push(("ProcessStatus", status.as_str().to_string()));
        }
        if let Some(challenge_type) = self.challenge_type {
            pairs.push(("ChallengeType", challenge_type.as_str().to_string()));
        }
        pairs.push(("PageIndex", self.page_index.to_string()));
        pairs.push(("PageSize", self.page_size.to_string()));
        pairs.push(("TargetLang", self.target_lang.clone()));
        pairs
    }
}

/// Query for `GET /v1/challenges`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogQuery {
    pub challenge_type: Option<ChallengeType>,
    pub improvement_tag: Option<ImprovementTag>,
    page_index: u32,
    page_size: u32,
    pub target_lang: String,
}

impl CatalogQuery {
    pub fn new(
        challenge_type: Option<ChallengeType>,
        improvement_tag: Option<ImprovementTag>,
        page_index: u32,
        page_size: u32,
        target_lang: impl Into<String>,
    ) -> Result<Self, QueryError> {
        check_paging(page_index, page_size)?;
        Ok(Self {
            challenge_type,
            improvement_tag,
            page_index,
            page_size,
            target_lang: target_lang.into(),
        })
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        if let Some(challenge_type) = self.challenge_type {
            pairs.push(("ChallengeType", challenge_type.as_str().to_string()));
        }
        if let Some(tag) = self.improvement_tag {
            pairs.push(("ImprovementTag", tag.as_str().to_string()));
        }
        pairs.push(("PageIndex", self.page_index.to_string()));
        pairs.push(("PageSize", self.page_size.to_string()));
        pairs.push(("TargetLang", self.target_lang.clone()));
        pairs
    }
}

/// Body of `PUT /v1/me/challenge-progress`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStepStatus {
    pub challenge_progress_id: ProgressId,
    pub step_id: StepId,
    pub step_status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_mood_id: Option<String>,
}

/// Body of `POST /v1/me/challenge-progresses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterChallenge {
    pub challenge_id: ChallengeId,
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub page_index: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            page_index: None,
            page_size: None,
            total_count: None,
        }
    }

    /// Whether more pages exist after this one, when the server says so
    pub fn has_more(&self) -> Option<bool> {
        let total = self.total_count?;
        let index = u64::from(self.page_index?);
        let size = u64::from(self.page_size?);
        Some(index * size < total)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageBody<T> {
    Envelope(Page<T>),
    Bare(Vec<T>),
}

/// Decode a list response, accepting a page envelope or a bare array
pub fn decode_page<T: DeserializeOwned>(body: serde_json::Value) -> Result<Page<T>, ApiError> {
    match serde_json::from_value::<PageBody<T>>(body)? {
        PageBody::Envelope(page) => Ok(page),
        PageBody::Bare(items) => Ok(Page::from_items(items)),
    }
}

/// Backend operations the timeline depends on
#[async_trait(?Send)]
pub trait ProgressApi {
    async fn fetch_progresses(
        &self,
        query: &ProgressQuery,
    ) -> Result<Page<ChallengeProgress>, ApiError>;

    async fn update_step_status(&self, request: &UpdateStepStatus) -> Result<(), ApiError>;

    /// The key must be fresh for each registration attempt
    async fn register_challenge(
        &self,
        request: &RegisterChallenge,
        idempotency_key: Uuid,
    ) -> Result<(), ApiError>;

    async fn fetch_challenges(&self, query: &CatalogQuery) -> Result<Page<Challenge>, ApiError>;
}
