use std::sync::Arc;

use async_trait::async_trait;
use game_types::{AcquisitionFailure, AttemptFailure, RemoteError};
use tracing::{debug, info, warn};

use crate::SynonymValidator;

pub const DEFAULT_MAX_WORD_ATTEMPTS: u32 = 5;

/// Remote random-word provider and thesaurus.
#[async_trait]
pub trait WordSource: Send + Sync {
    async fn random_word(&self) -> Result<String, RemoteError>;
    async fn synonyms(&self, word: &str) -> Result<Vec<String>, RemoteError>;
}

/// Proactive reachability check performed before network actions.
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_online(&self) -> bool;
}

pub struct AlwaysOnline;

#[async_trait]
impl Connectivity for AlwaysOnline {
    async fn is_online(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    GiveUp,
}

/// Single place deciding whether a failed attempt is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Transport failures count as "no valid synonyms" when set.
    pub retry_connectivity_failures: bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            retry_connectivity_failures: true,
        }
    }

    pub fn decide(&self, attempts_made: u32, failure: &AttemptFailure) -> RetryDecision {
        if failure.is_connectivity() && !self.retry_connectivity_failures {
            return RetryDecision::GiveUp;
        }

        if attempts_made < self.max_attempts {
            RetryDecision::Retry
        } else {
            RetryDecision::GiveUp
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORD_ATTEMPTS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredWord {
    pub word: String,
    pub synonyms: Vec<String>,
    pub attempts: u32,
}

/// Fetches candidate words until one has at least one valid synonym.
#[derive(Clone)]
pub struct WordAcquirer {
    source: Arc<dyn WordSource>,
    validator: SynonymValidator,
    connectivity: Arc<dyn Connectivity>,
    policy: RetryPolicy,
}

impl WordAcquirer {
    pub fn new(
        source: Arc<dyn WordSource>,
        connectivity: Arc<dyn Connectivity>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            validator: SynonymValidator::new(source.clone()),
            source,
            connectivity,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn acquire(&self) -> Result<AcquiredWord, AcquisitionFailure> {
        let mut attempts = 0;

        loop {
            if !self.connectivity.is_online().await {
                warn!("Offline before word attempt {}", attempts + 1);
                return Err(AcquisitionFailure::Offline);
            }

            attempts += 1;
            match self.attempt().await {
                Ok((word, synonyms)) => {
                    info!("Accepted word after {} attempt(s)", attempts);
                    return Ok(AcquiredWord {
                        word,
                        synonyms,
                        attempts,
                    });
                }
                Err(failure) => match self.policy.decide(attempts, &failure) {
                    RetryDecision::Retry => {
                        debug!(
                            "Retrying word fetch ({}/{}): {}",
                            attempts, self.policy.max_attempts, failure
                        );
                    }
                    RetryDecision::GiveUp => {
                        warn!("Giving up on word fetch after {} attempts: {}", attempts, failure);
                        return Err(AcquisitionFailure::Exhausted {
                            attempts,
                            last: failure,
                        });
                    }
                },
            }
        }
    }

    async fn attempt(&self) -> Result<(String, Vec<String>), AttemptFailure> {
        let word = self
            .source
            .random_word()
            .await
            .map_err(AttemptFailure::WordRequest)?
            .trim()
            .to_lowercase();

        if word.is_empty() {
            return Err(AttemptFailure::EmptyWord);
        }

        debug!("Checking synonyms for candidate word");
        let synonyms = self
            .validator
            .validate(&word)
            .await
            .map_err(AttemptFailure::SynonymRequest)?;

        if synonyms.is_empty() {
            return Err(AttemptFailure::NoValidSynonyms { word });
        }

        Ok((word, synonyms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_bounds() {
        let policy = RetryPolicy::default();
        let failure = AttemptFailure::NoValidSynonyms {
            word: "qat".to_string(),
        };

        assert_eq!(policy.decide(1, &failure), RetryDecision::Retry);
        assert_eq!(policy.decide(4, &failure), RetryDecision::Retry);
        assert_eq!(policy.decide(5, &failure), RetryDecision::GiveUp);
    }

    #[test]
    fn test_policy_can_stop_on_connectivity_failures() {
        let offline = AttemptFailure::WordRequest(RemoteError::Unreachable {
            message: "dns".to_string(),
        });

        let parity = RetryPolicy::default();
        assert_eq!(parity.decide(1, &offline), RetryDecision::Retry);

        let strict = RetryPolicy {
            retry_connectivity_failures: false,
            ..RetryPolicy::default()
        };
        assert_eq!(strict.decide(1, &offline), RetryDecision::GiveUp);

        let status = AttemptFailure::WordRequest(RemoteError::Status { status: 502 });
        assert_eq!(strict.decide(1, &status), RetryDecision::Retry);
    }
}
