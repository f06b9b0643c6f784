use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use game_core::WordSource;
use game_types::RemoteError;

use super::{check_status, read_json, transport_error};

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WordField {
    Many(Vec<String>),
    One(String),
}

#[derive(Debug, Deserialize)]
struct RandomWordResponse {
    #[serde(default)]
    word: Option<WordField>,
}

impl RandomWordResponse {
    fn first_word(self) -> Option<String> {
        match self.word? {
            WordField::Many(words) => words.into_iter().next(),
            WordField::One(word) => Some(word),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThesaurusResponse {
    #[serde(default)]
    synonyms: Option<Vec<Option<String>>>,
}

/// Random-word and thesaurus endpoints behind one API key.
#[derive(Clone)]
pub struct WordApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl WordApiClient {
    pub fn new(client: Client, base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url.join(path).map_err(|e| RemoteError::Malformed {
            message: format!("bad endpoint {}: {}", path, e),
        })
    }
}

#[async_trait]
impl WordSource for WordApiClient {
    async fn random_word(&self) -> Result<String, RemoteError> {
        let url = self.endpoint("v1/randomword")?;
        tracing::debug!("Requesting random word");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(transport_error)?;
        let body: RandomWordResponse = read_json(check_status(response)?).await?;

        // An empty list becomes an empty word, which the acquirer rejects.
        Ok(body
            .first_word()
            .map(|word| word.to_lowercase())
            .unwrap_or_default())
    }

    async fn synonyms(&self, word: &str) -> Result<Vec<String>, RemoteError> {
        let url = self.endpoint("v1/thesaurus")?;
        tracing::debug!("Requesting synonyms for '{}'", word);

        let response = self
            .client
            .get(url)
            .query(&[("word", word)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(transport_error)?;
        let body: ThesaurusResponse = read_json(check_status(response)?).await?;

        Ok(body.synonyms.unwrap_or_default().into_iter().flatten().collect())
    }
}
