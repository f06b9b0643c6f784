use serde::{Deserialize, Serialize};

use crate::{GameError, RoundSnapshot};

/// Player actions sent from the front-end to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientCommand {
    StartRound,
    SubmitGuess { text: String },
    CheckLetter { input: String },
    RevealWordLength,
    RequestTip,
    Status,
}

/// Notifications from the session to the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionMessage {
    FetchingWord,
    RoundStarted { state: RoundSnapshot },
    StateUpdate { state: RoundSnapshot },
    ClockTick { elapsed_seconds: u64 },
    GuessResult { guess: String, correct: bool, state: RoundSnapshot },
    HintAvailable,
    LetterChecked { letter: char, count: u32, state: RoundSnapshot },
    WordLength { length: usize, state: RoundSnapshot },
    SynonymTip { synonym: String },
    WordReplaced { state: RoundSnapshot },
    RoundWon { word: String, score: u32, elapsed_seconds: u64 },
    RoundOver { word: String, final_score: u32 },
    ScoreSubmitted { name: String, score: u32, seconds: u64 },
    Rejected { error: GameError },
    Notice { message: String },
    Fatal { reason: String },
}

impl SessionMessage {
    /// Fatal messages end the game screen.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionMessage::Fatal { .. })
    }
}
