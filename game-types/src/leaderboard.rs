use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One posted result. Rows are identified by `name` when diffing board updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_number")]
    pub score: i64,
    #[serde(deserialize_with = "lenient_number")]
    pub seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: i64, seconds: u64) -> Self {
        Self {
            name: name.into(),
            score,
            seconds,
            text: None,
            date: None,
        }
    }

    /// Elapsed time as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        format!("{:02}:{:02}", self.seconds / 60, self.seconds % 60)
    }

    /// Two rows for the same player render identically iff score and time match.
    pub fn same_content(&self, other: &LeaderboardEntry) -> bool {
        self.score == other.score && self.seconds == other.seconds
    }
}

// The board service serializes numbers as strings and numeric names as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

fn lenient_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match NumberOrText::<T>::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::<i64>::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value.to_string()),
        NumberOrText::Text(text) => Ok(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_time() {
        assert_eq!(LeaderboardEntry::new("A", 10, 0).formatted_time(), "00:00");
        assert_eq!(LeaderboardEntry::new("A", 10, 75).formatted_time(), "01:15");
        assert_eq!(LeaderboardEntry::new("A", 10, 3599).formatted_time(), "59:59");
        assert_eq!(LeaderboardEntry::new("A", 10, 6000).formatted_time(), "100:00");
    }

    #[test]
    fn test_deserialize_string_numbers() {
        let json = r#"{"name":"Alice","score":"150","seconds":"42","text":"","date":"10/17/2026 3:22:01 PM"}"#;
        let entry: LeaderboardEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.name, "Alice");
        assert_eq!(entry.score, 150);
        assert_eq!(entry.seconds, 42);
        assert_eq!(entry.text.as_deref(), Some(""));
    }

    #[test]
    fn test_deserialize_plain_numbers_and_numeric_name() {
        let json = r#"{"name":1234,"score":60,"seconds":7}"#;
        let entry: LeaderboardEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.name, "1234");
        assert_eq!(entry.score, 60);
        assert_eq!(entry.seconds, 7);
        assert_eq!(entry.date, None);
    }

    #[test]
    fn test_deserialize_rejects_garbage_score() {
        let json = r#"{"name":"Bob","score":"lots","seconds":"1"}"#;
        assert!(serde_json::from_str::<LeaderboardEntry>(json).is_err());
    }

    #[test]
    fn test_same_content() {
        let a = LeaderboardEntry::new("A", 10, 5);
        assert!(a.same_content(&LeaderboardEntry::new("A", 10, 5)));
        assert!(!a.same_content(&LeaderboardEntry::new("A", 20, 5)));
        assert!(!a.same_content(&LeaderboardEntry::new("A", 10, 6)));
    }
}
