use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use game_types::{GameError, RoundId, RoundPhase, RoundSnapshot};
use tracing::{debug, info};
use uuid::Uuid;

use crate::economy::{
    HINT_UNLOCK_GUESSES, HintEconomy, LETTER_CHECK_COST, STARTING_ATTEMPTS, STARTING_SCORE,
    TIP_COST, WORD_LENGTH_COST,
};
use crate::{RoundEvent, RoundEventBus, RoundEventHandler};

#[derive(Debug, Clone)]
pub struct Round {
    pub id: RoundId,
    pub secret_word: String, // Hidden from snapshots
    pub score: u32,
    pub attempts_left: u32,
    pub elapsed_seconds: u64,
    pub total_guesses: u32,
    pub word_length_revealed: bool,
    pub tip_used: bool,
    pub solved: bool,
    pub checked_letters: BTreeMap<char, u32>,
    pub started_at: DateTime<Utc>,
}

impl Round {
    pub fn new(word: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            secret_word: word.trim().to_lowercase(),
            score: STARTING_SCORE,
            attempts_left: STARTING_ATTEMPTS,
            elapsed_seconds: 0,
            total_guesses: 0,
            word_length_revealed: false,
            tip_used: false,
            solved: false,
            checked_letters: BTreeMap::new(),
            started_at: Utc::now(),
        }
    }

    pub fn word_length(&self) -> usize {
        self.secret_word.chars().count()
    }

    pub fn count_letter(&self, letter: char) -> u32 {
        self.secret_word.chars().filter(|&c| c == letter).count() as u32
    }

    pub fn is_exhausted(&self) -> bool {
        HintEconomy::is_exhausted(self.score, self.attempts_left)
    }

    /// Swap in a new secret word, keeping score, attempts and clock.
    fn reset_word_state(&mut self, word: &str) {
        self.id = Uuid::new_v4();
        self.secret_word = word.trim().to_lowercase();
        self.total_guesses = 0;
        self.word_length_revealed = false;
        self.tip_used = false;
        self.solved = false;
        self.checked_letters.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    pub guess: String,
    pub correct: bool,
    pub score: u32,
    pub attempts_left: u32,
    pub hint_available: bool,
    pub round_over: bool,
}

/// A paid tip waiting for its synonym lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipRequest {
    pub round_id: RoundId,
    pub word: String,
}

/// Owns the current round and applies every guess and hint to it.
#[derive(Debug)]
pub struct RoundMachine {
    phase: RoundPhase,
    round: Option<Round>,
    event_bus: RoundEventBus,
}

impl RoundMachine {
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::NotStarted,
            round: None,
            event_bus: RoundEventBus::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn RoundEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn round_id(&self) -> Option<RoundId> {
        self.round.as_ref().map(|round| round.id)
    }

    /// True when `round_id` still names the live round.
    pub fn is_current(&self, round_id: RoundId) -> bool {
        self.round_id() == Some(round_id)
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let Some(round) = &self.round else {
            return RoundSnapshot::not_started(STARTING_SCORE, STARTING_ATTEMPTS);
        };

        RoundSnapshot {
            round_id: Some(round.id),
            phase: self.phase,
            score: round.score,
            attempts_left: round.attempts_left,
            elapsed_seconds: round.elapsed_seconds,
            total_guesses: round.total_guesses,
            word_length: round.word_length_revealed.then(|| round.word_length()),
            tip_used: round.tip_used,
            hint_available: HintEconomy::tip_unlocked(round.total_guesses),
            solved: round.solved,
            checked_letters: round.checked_letters.clone(),
            started_at: Some(round.started_at.to_rfc3339()),
        }
    }

    /// Begin a fresh round: full score, full attempts, clock at zero.
    pub fn start(&mut self, word: &str) -> RoundId {
        let round = Round::new(word);
        let round_id = round.id;
        let word_length = round.word_length();

        info!("Round {} started ({} letters)", round_id, word_length);
        self.round = Some(round);
        self.phase = RoundPhase::InProgress;
        self.event_bus.publish(RoundEvent::RoundStarted {
            round_id,
            word_length,
        });

        round_id
    }

    /// Replace the secret word mid-round. Per-word hint state starts over.
    pub fn replace_word(&mut self, word: &str) -> Result<RoundId, GameError> {
        if self.phase != RoundPhase::InProgress {
            return Err(GameError::RoundNotInProgress);
        }
        let round = self.round.as_mut().ok_or(GameError::RoundNotInProgress)?;

        round.reset_word_state(word);
        let round_id = round.id;
        let word_length = round.word_length();

        info!("Round word replaced, now {}", round_id);
        self.event_bus.publish(RoundEvent::WordReplaced {
            round_id,
            word_length,
        });

        Ok(round_id)
    }

    pub fn submit_guess(&mut self, text: &str) -> Result<Option<GuessOutcome>, GameError> {
        let guess = text.trim().to_lowercase();
        if guess.is_empty() {
            return Ok(None);
        }

        let round = self.active_round_mut()?;
        round.attempts_left = round.attempts_left.saturating_sub(1);
        round.total_guesses += 1;

        let correct = guess == round.secret_word;
        round.score = HintEconomy::score_guess(round.score, correct);
        round.solved = correct;

        let outcome = GuessOutcome {
            guess,
            correct,
            score: round.score,
            attempts_left: round.attempts_left,
            hint_available: HintEconomy::tip_unlocked(round.total_guesses),
            round_over: round.is_exhausted(),
        };
        let round_id = round.id;
        let word = round.secret_word.clone();
        let elapsed_seconds = round.elapsed_seconds;
        let unlocked_now = round.total_guesses == HINT_UNLOCK_GUESSES;

        debug!(
            "Guess {} on round {}: score {}, {} attempts left",
            if correct { "hit" } else { "miss" },
            round_id,
            outcome.score,
            outcome.attempts_left
        );

        self.event_bus.publish(RoundEvent::GuessEvaluated {
            round_id,
            guess: outcome.guess.clone(),
            correct,
            score: outcome.score,
            attempts_left: outcome.attempts_left,
        });

        if unlocked_now {
            self.event_bus.publish(RoundEvent::HintAvailable { round_id });
        }

        if correct {
            self.event_bus.publish(RoundEvent::RoundWon {
                round_id,
                word: word.clone(),
                score: outcome.score,
                elapsed_seconds,
            });
        }

        if outcome.round_over {
            info!("Round {} over with score {}", round_id, outcome.score);
            self.phase = RoundPhase::Over;
            self.event_bus.publish(RoundEvent::RoundOver {
                round_id,
                word,
                final_score: outcome.score,
            });
        }

        Ok(Some(outcome))
    }

    /// Pay for the occurrence count of one letter. Zero counts still cost.
    pub fn check_letter(&mut self, input: &str) -> Result<u32, GameError> {
        let round = self.active_round_mut()?;
        let new_score = HintEconomy::charge(round.score, LETTER_CHECK_COST)?;

        let mut chars = input.trim().chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_lowercase().next().unwrap_or(c),
            _ => {
                return Err(GameError::InvalidLetter {
                    input: input.to_string(),
                });
            }
        };

        let count = round.count_letter(letter);
        round.score = new_score;
        round.checked_letters.insert(letter, count);
        let round_id = round.id;

        self.event_bus.publish(RoundEvent::LetterChecked {
            round_id,
            letter,
            count,
        });

        Ok(count)
    }

    pub fn reveal_word_length(&mut self) -> Result<usize, GameError> {
        let round = self.active_round_mut()?;
        if round.word_length_revealed {
            return Err(GameError::WordLengthAlreadyRevealed);
        }

        round.score = HintEconomy::charge(round.score, WORD_LENGTH_COST)?;
        round.word_length_revealed = true;
        let length = round.word_length();
        let round_id = round.id;

        self.event_bus
            .publish(RoundEvent::WordLengthRevealed { round_id, length });

        Ok(length)
    }

    /// Pay for a synonym tip. The lookup itself happens outside the machine.
    pub fn request_tip(&mut self) -> Result<TipRequest, GameError> {
        let round = self.active_round_mut()?;
        if round.tip_used {
            return Err(GameError::TipAlreadyUsed);
        }

        round.score = HintEconomy::charge(round.score, TIP_COST)?;
        round.tip_used = true;
        let request = TipRequest {
            round_id: round.id,
            word: round.secret_word.clone(),
        };

        self.event_bus.publish(RoundEvent::TipPurchased {
            round_id: request.round_id,
        });

        Ok(request)
    }

    /// Advance the clock by one second while the round is in progress.
    pub fn tick(&mut self) -> Option<u64> {
        if self.phase != RoundPhase::InProgress {
            return None;
        }

        let round = self.round.as_mut()?;
        round.elapsed_seconds += 1;
        Some(round.elapsed_seconds)
    }

    fn active_round_mut(&mut self) -> Result<&mut Round, GameError> {
        if self.phase != RoundPhase::InProgress {
            return Err(GameError::RoundNotInProgress);
        }

        let round = self.round.as_mut().ok_or(GameError::RoundNotInProgress)?;
        if round.solved {
            return Err(GameError::WordAlreadySolved);
        }

        Ok(round)
    }
}

impl Default for RoundMachine {
    fn default() -> Self {
        Self::new()
    }
}
