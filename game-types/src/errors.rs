use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Local precondition failures. None of these mutate round state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum GameError {
    #[error("Not enough points: {required} needed, {available} available")]
    InsufficientPoints { required: u32, available: u32 },
    #[error("Word length already revealed")]
    WordLengthAlreadyRevealed,
    #[error("Tip already used for this word")]
    TipAlreadyUsed,
    #[error("Tip unlocks after {required} guesses")]
    TipLocked { required: u32 },
    #[error("Enter exactly one letter")]
    InvalidLetter { input: String },
    #[error("Word already guessed, wait for the next one")]
    WordAlreadySolved,
    #[error("No round in progress")]
    RoundNotInProgress,
    #[error("Still fetching a word")]
    WordPending,
}

impl GameError {
    pub fn is_insufficient_points(&self) -> bool {
        matches!(self, GameError::InsufficientPoints { .. })
    }
}

/// Any failed call to a remote collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum RemoteError {
    #[error("Service unreachable: {message}")]
    Unreachable { message: String },
    #[error("Service returned status {status}")]
    Status { status: u16 },
    #[error("Malformed response: {message}")]
    Malformed { message: String },
}

impl RemoteError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, RemoteError::Unreachable { .. })
    }
}

/// Why a single fetch-and-validate attempt did not yield a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum AttemptFailure {
    #[error("word request failed: {0}")]
    WordRequest(RemoteError),
    #[error("synonym request failed: {0}")]
    SynonymRequest(RemoteError),
    #[error("provider returned an empty word")]
    EmptyWord,
    #[error("no valid synonyms for '{word}'")]
    NoValidSynonyms { word: String },
}

impl AttemptFailure {
    pub fn is_connectivity(&self) -> bool {
        match self {
            AttemptFailure::WordRequest(err) | AttemptFailure::SynonymRequest(err) => {
                err.is_connectivity()
            }
            _ => false,
        }
    }
}

/// Terminal outcome of the word-acquisition loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum AcquisitionFailure {
    #[error("No Internet Connection")]
    Offline,
    #[error("Could not find a playable word after {attempts} attempts ({last})")]
    Exhausted { attempts: u32, last: AttemptFailure },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum PlayerNameError {
    #[error("Name cannot be empty")]
    Empty,
}
