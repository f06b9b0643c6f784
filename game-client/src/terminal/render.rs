use game_types::{GameError, RoundSnapshot, SessionMessage};

pub const HELP: &str = "\
Type a word to guess it.
  /letter <c>  count a letter in the word (5 points)
  /length      reveal the word length (5 points, once per word)
  /tip         show a synonym (10 points, after 5 guesses)
  /new         start a new round after game over
  /status      show score, attempts and time
  /quit        back to the menu";

pub fn status_line(state: &RoundSnapshot) -> String {
    let mut line = format!(
        "Score: {} | Attempts left: {} | Time: {}s",
        state.score, state.attempts_left, state.elapsed_seconds
    );
    if let Some(length) = state.word_length {
        line.push_str(&format!(" | Letters: {}", length));
    }
    line
}

fn with_letters(state: &RoundSnapshot, mut lines: Vec<String>) -> String {
    lines.push(status_line(state));
    if let Some(letters) = state.checked_letters_line() {
        lines.push(letters);
    }
    lines.join("\n")
}

pub fn rejection(error: &GameError) -> String {
    match error {
        GameError::InsufficientPoints { .. } => format!("Not enough points! {}", error),
        _ => error.to_string(),
    }
}

/// Text for one session message. Clock ticks render nothing.
pub fn render_message(message: &SessionMessage) -> Option<String> {
    let text = match message {
        SessionMessage::FetchingWord => "Finding a word...".to_string(),
        SessionMessage::RoundStarted { state } => {
            with_letters(state, vec!["New word ready. Start guessing!".to_string()])
        }
        SessionMessage::StateUpdate { state } => with_letters(state, Vec::new()),
        SessionMessage::ClockTick { .. } => return None,
        SessionMessage::GuessResult {
            guess,
            correct,
            state,
        } => {
            let verdict = if *correct {
                format!("'{}' is correct!", guess)
            } else {
                format!("'{}' is not the word.", guess)
            };
            with_letters(state, vec![verdict])
        }
        SessionMessage::HintAvailable => "Tip unlocked! Type /tip for a synonym.".to_string(),
        SessionMessage::LetterChecked {
            letter,
            count,
            state,
        } => with_letters(
            state,
            vec![format!("'{}' appears {} time(s).", letter, count)],
        ),
        SessionMessage::WordLength { length, state } => {
            with_letters(state, vec![format!("The word has {} letters.", length)])
        }
        SessionMessage::SynonymTip { synonym } => format!("Tip: a synonym is '{}'", synonym),
        SessionMessage::WordReplaced { state } => with_letters(
            state,
            vec!["The word was swapped for a new one. Hints reset.".to_string()],
        ),
        SessionMessage::RoundWon {
            word,
            score,
            elapsed_seconds,
        } => format!(
            "Congratulations! You guessed '{}' in {}s. Score: {}",
            word, elapsed_seconds, score
        ),
        SessionMessage::RoundOver { word, final_score } => format!(
            "Game over! The word was '{}'. Final score: {}\nType /new to play again or /quit.",
            word, final_score
        ),
        SessionMessage::ScoreSubmitted { name, score, .. } => {
            format!("Posted {} points for {} to the leaderboard.", score, name)
        }
        SessionMessage::Rejected { error } => rejection(error),
        SessionMessage::Notice { message } => message.clone(),
        SessionMessage::Fatal { reason } => format!("{}. Returning to the menu.", reason),
    };

    Some(text)
}
