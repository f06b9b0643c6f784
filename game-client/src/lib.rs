use std::sync::Arc;

use game_persistence::repositories::PreferenceRepository;

use crate::api::{DreamloClient, HttpConnectivity, WordApiClient, build_http_client};
use crate::config::Config;
use crate::session::SessionServices;

pub mod api;
pub mod config;
pub mod session;
pub mod terminal;

/// Wire the HTTP clients and preference store into session services.
pub fn build_services(
    config: &Config,
    preferences: PreferenceRepository,
) -> Result<SessionServices, reqwest::Error> {
    let client = build_http_client(config.request_timeout())?;

    Ok(SessionServices {
        words: Arc::new(WordApiClient::new(
            client.clone(),
            config.word_api_base_url.clone(),
            config.word_api_key.clone(),
        )),
        leaderboard: Arc::new(DreamloClient::new(
            client.clone(),
            config.leaderboard_base_url.clone(),
            config.leaderboard_private_code.clone(),
            config.leaderboard_public_code.clone(),
        )),
        connectivity: Arc::new(HttpConnectivity::new(
            client,
            config.word_api_base_url.clone(),
        )),
        preferences: Arc::new(preferences),
    })
}
