use std::time::Duration;

use game_types::RemoteError;
use reqwest::{Client, Response};

pub mod connectivity;
pub mod leaderboard_api;
pub mod word_api;

pub use connectivity::HttpConnectivity;
pub use leaderboard_api::DreamloClient;
pub use word_api::WordApiClient;

/// Shared HTTP client with a whole-request timeout.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    tracing::warn!("Request failed: {:?}", e);
    RemoteError::Unreachable {
        message: e.to_string(),
    }
}

fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!("{} returned status: {}", response.url().path(), status);
        return Err(RemoteError::Status {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    response.json().await.map_err(|e| {
        tracing::warn!("Failed to parse response JSON: {:?}", e);
        RemoteError::Malformed {
            message: e.to_string(),
        }
    })
}
