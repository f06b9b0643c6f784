use game_types::GameError;

pub const STARTING_SCORE: u32 = 100;
pub const STARTING_ATTEMPTS: u32 = 10;
pub const CORRECT_GUESS_REWARD: u32 = 50;
pub const WRONG_GUESS_PENALTY: u32 = 10;
pub const LETTER_CHECK_COST: u32 = 5;
pub const WORD_LENGTH_COST: u32 = 5;
pub const TIP_COST: u32 = 10;
pub const HINT_UNLOCK_GUESSES: u32 = 5;

/// Points arithmetic for guesses and paid hints. Scores never go below zero.
pub struct HintEconomy;

impl HintEconomy {
    /// Deduct `cost` from `score`, or refuse if the player cannot afford it.
    pub fn charge(score: u32, cost: u32) -> Result<u32, GameError> {
        if score < cost {
            return Err(GameError::InsufficientPoints {
                required: cost,
                available: score,
            });
        }
        Ok(score.saturating_sub(cost))
    }

    /// Score after a guess: reward on a hit, floored penalty on a miss.
    pub fn score_guess(score: u32, correct: bool) -> u32 {
        if correct {
            score.saturating_add(CORRECT_GUESS_REWARD)
        } else {
            score.saturating_sub(WRONG_GUESS_PENALTY)
        }
    }

    pub fn is_exhausted(score: u32, attempts_left: u32) -> bool {
        score == 0 || attempts_left == 0
    }

    /// The tip is offered once this many guesses were made on the current word.
    pub fn tip_unlocked(total_guesses: u32) -> bool {
        total_guesses >= HINT_UNLOCK_GUESSES
    }
}
