use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use game_core::LeaderboardService;
use game_types::{LeaderboardEntry, PlayerName, RemoteError};

use super::{check_status, transport_error};

// Envelope: {"dreamlo": {"leaderboard": {"entry": [...] | {...} | null} | null}}
#[derive(Debug, Deserialize)]
struct BoardEnvelope {
    dreamlo: DreamloBody,
}

#[derive(Debug, Deserialize)]
struct DreamloBody {
    #[serde(default)]
    leaderboard: Option<BoardBody>,
}

#[derive(Debug, Deserialize)]
struct BoardBody {
    #[serde(default)]
    entry: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<LeaderboardEntry>),
    One(LeaderboardEntry),
}

impl BoardEnvelope {
    fn into_entries(self) -> Vec<LeaderboardEntry> {
        match self.dreamlo.leaderboard.and_then(|board| board.entry) {
            Some(OneOrMany::Many(entries)) => entries,
            Some(OneOrMany::One(entry)) => vec![entry],
            None => Vec::new(),
        }
    }
}

/// Flatten a board payload into rows in service order.
pub fn parse_board(body: &str) -> Result<Vec<LeaderboardEntry>, RemoteError> {
    serde_json::from_str::<BoardEnvelope>(body)
        .map(BoardEnvelope::into_entries)
        .map_err(|e| RemoteError::Malformed {
            message: e.to_string(),
        })
}

/// dreamlo-style board: writes under the private code, reads under the public one.
#[derive(Clone)]
pub struct DreamloClient {
    client: Client,
    base_url: Url,
    private_code: String,
    public_code: String,
}

impl DreamloClient {
    pub fn new(
        client: Client,
        base_url: Url,
        private_code: impl Into<String>,
        public_code: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            private_code: private_code.into(),
            public_code: public_code.into(),
        }
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Malformed {
                message: format!("{} cannot take path segments", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Write URL with each value percent-encoded as its own path segment.
    pub fn submit_url(&self, name: &PlayerName, score: u32, seconds: u64) -> Result<Url, RemoteError> {
        let score = score.to_string();
        let seconds = seconds.to_string();
        self.url_with_segments(&[
            self.private_code.as_str(),
            "add",
            name.as_str(),
            score.as_str(),
            seconds.as_str(),
        ])
    }

    pub fn board_url(&self, public_code: &str) -> Result<Url, RemoteError> {
        self.url_with_segments(&[public_code, "json"])
    }

    /// Read any board by its public code.
    pub async fn fetch_board(&self, public_code: &str) -> Result<Vec<LeaderboardEntry>, RemoteError> {
        let url = self.board_url(public_code)?;
        tracing::debug!("Fetching leaderboard");

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let response = check_status(response)?;
        let body = response.text().await.map_err(transport_error)?;

        let entries = parse_board(&body).inspect_err(|e| {
            tracing::warn!("Failed to parse leaderboard: {}", e);
        })?;
        tracing::debug!("Leaderboard has {} entries", entries.len());
        Ok(entries)
    }
}

#[async_trait]
impl LeaderboardService for DreamloClient {
    async fn submit(&self, name: &PlayerName, score: u32, seconds: u64) -> Result<(), RemoteError> {
        let url = self.submit_url(name, score, seconds)?;
        tracing::info!("Submitting score {} ({}s)", score, seconds);

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        check_status(response)?;
        Ok(())
    }

    async fn fetch(&self) -> Result<Vec<LeaderboardEntry>, RemoteError> {
        self.fetch_board(&self.public_code).await
    }
}
