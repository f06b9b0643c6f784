use async_trait::async_trait;
use reqwest::{Client, Url};

use game_core::Connectivity;

/// Reachability probe: any HTTP response from the probe host means online.
#[derive(Clone)]
pub struct HttpConnectivity {
    client: Client,
    probe_url: Url,
}

impl HttpConnectivity {
    pub fn new(client: Client, probe_url: Url) -> Self {
        Self { client, probe_url }
    }
}

#[async_trait]
impl Connectivity for HttpConnectivity {
    async fn is_online(&self) -> bool {
        match self.client.head(self.probe_url.clone()).send().await {
            Ok(response) => {
                tracing::debug!("Connectivity probe answered {}", response.status());
                true
            }
            Err(e) => {
                tracing::warn!("Connectivity probe failed: {}", e);
                false
            }
        }
    }
}
