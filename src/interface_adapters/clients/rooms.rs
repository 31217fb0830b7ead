use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::frameworks::config;

// Room descriptor returned by the matchmaking endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub room_id: String,
    pub theme_id: String,
    pub player_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomRequest<'a> {
    theme_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Debug)]
pub enum RoomsError {
    ThemeNotFound,
    InvalidResponse,
    UpstreamUnavailable,
}

// Thin reqwest client for room lookup/creation before opening the socket.
#[derive(Clone)]
pub struct RoomsClient {
    http: reqwest::Client,
    base_url: String,
}

impl RoomsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn from_env() -> Result<Self, reqwest::Error> {
        Self::new(config::api_url(), config::request_timeout())
    }

    /// Finds an open room for the theme, creating one when none exists.
    pub async fn get_or_create_room(&self, theme_id: &str) -> Result<RoomInfo, RoomsError> {
        let url = format!("{}/rooms", self.base_url);
        let response = self
            .http
            .post(url)
            .json(&RoomRequest { theme_id })
            .send()
            .await
            .map_err(|_| RoomsError::UpstreamUnavailable)?;

        if response.status().is_success() {
            return response
                .json::<RoomInfo>()
                .await
                .map_err(|_| RoomsError::InvalidResponse);
        }

        if response.status() == StatusCode::NOT_FOUND {
            let error = response
                .json::<ErrorResponse>()
                .await
                .map_err(|_| RoomsError::InvalidResponse)?;
            if error.message == "theme not found" {
                return Err(RoomsError::ThemeNotFound);
            }
            return Err(RoomsError::InvalidResponse);
        }

        Err(RoomsError::UpstreamUnavailable)
    }
}
