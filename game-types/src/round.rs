use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub type RoundId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    NotStarted, // No word accepted yet
    InProgress, // Guesses and hints accepted
    Over,       // Score or attempts exhausted
}

/// Player-facing view of a round. Never carries the secret word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round_id: Option<RoundId>,
    pub phase: RoundPhase,
    pub score: u32,
    pub attempts_left: u32,
    pub elapsed_seconds: u64,
    pub total_guesses: u32,
    pub word_length: Option<usize>, // Only once revealed
    pub tip_used: bool,
    pub hint_available: bool,
    pub solved: bool,
    pub checked_letters: BTreeMap<char, u32>,
    pub started_at: Option<String>, // ISO 8601 string
}

impl RoundSnapshot {
    /// Snapshot for a machine that has never been given a word.
    pub fn not_started(score: u32, attempts_left: u32) -> Self {
        Self {
            round_id: None,
            phase: RoundPhase::NotStarted,
            score,
            attempts_left,
            elapsed_seconds: 0,
            total_guesses: 0,
            word_length: None,
            tip_used: false,
            hint_available: false,
            solved: false,
            checked_letters: BTreeMap::new(),
            started_at: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == RoundPhase::Over
    }

    /// "Checked letters: a(1) e(0)" in letter order, or `None` before any check.
    pub fn checked_letters_line(&self) -> Option<String> {
        if self.checked_letters.is_empty() {
            return None;
        }

        let letters: Vec<String> = self
            .checked_letters
            .iter()
            .map(|(letter, count)| format!("{}({})", letter, count))
            .collect();

        Some(format!("Checked letters: {}", letters.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_letters_line() {
        let mut snapshot = RoundSnapshot::not_started(100, 10);
        assert_eq!(snapshot.checked_letters_line(), None);

        snapshot.checked_letters.insert('e', 0);
        snapshot.checked_letters.insert('a', 2);
        assert_eq!(
            snapshot.checked_letters_line().as_deref(),
            Some("Checked letters: a(2) e(0)")
        );
    }

    #[test]
    fn test_snapshot_serialization_hides_word() {
        let snapshot = RoundSnapshot::not_started(100, 10);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"score\":100"));
        assert!(!json.contains("secret"));
    }
}
