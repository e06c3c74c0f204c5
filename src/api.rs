//! Backend client for the bot's trainer API.

use std::time::Duration;

use reqwest::StatusCode;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dex::StatusRecord;
use crate::state::Profile;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ApiError {
    /// The backend answered 400: it does not know this trainer id.
    #[error("unknown trainer id")]
    UnknownTrainer,
    #[error("backend returned HTTP {status}")]
    Http { status: u16 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The one status line shown to the trainer.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::UnknownTrainer => {
                "Invalid trainer: player data not found. Please log in with the link from the bot (login?id=YOUR_DISCORD_ID).".to_string()
            }
            _ => "Failed to load data from the backend. Please try again later.".to_string(),
        }
    }

    pub fn is_unknown_trainer(&self) -> bool {
        matches!(self, ApiError::UnknownTrainer)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/{trainer_id}`
    pub async fn fetch_profile(&self, trainer_id: &str) -> Result<Profile, ApiError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(trainer_id));
        self.get_json(&url).await
    }

    /// `GET {base}/pokedex/{trainer_id}`
    pub async fn fetch_pokedex(&self, trainer_id: &str) -> Result<Vec<StatusRecord>, ApiError> {
        let url = format!(
            "{}/pokedex/{}",
            self.base_url,
            urlencoding::encode(trainer_id)
        );
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(%url, "backend request");
        let response = self.http.get(url).send().await?;
        check_status(response.status())?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| {
            tracing::warn!(%url, error = %err, "backend body did not decode");
            ApiError::Decode(err.to_string())
        })
    }
}

pub fn check_status(status: StatusCode) -> Result<(), ApiError> {
    if status == StatusCode::BAD_REQUEST {
        return Err(ApiError::UnknownTrainer);
    }
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
        });
    }
    Ok(())
}
