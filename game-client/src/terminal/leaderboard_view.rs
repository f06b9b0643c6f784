use game_core::{EntryChange, diff_entries};
use game_types::LeaderboardEntry;

pub const EMPTY_BOARD: &str = "Leaderboard is empty";
pub const LOAD_FAILED: &str = "Failed to load leaderboard";

/// Board rows as last shown, updated by minimal diff on refresh.
#[derive(Debug, Default)]
pub struct LeaderboardView {
    entries: Vec<LeaderboardEntry>,
}

impl LeaderboardView {
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Replace the rows and report what changed.
    pub fn apply(&mut self, entries: Vec<LeaderboardEntry>) -> Vec<EntryChange> {
        let changes = diff_entries(&self.entries, &entries);
        self.entries = entries;
        changes
    }

    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return EMPTY_BOARD.to_string();
        }

        let mut lines = vec![format!("{:>3}  {:<20} {:>6}  {:>5}", "#", "Name", "Score", "Time")];
        lines.extend(self.entries.iter().enumerate().map(|(index, entry)| {
            format!(
                "{:>3}. {:<20} {:>6}  {:>5}",
                index + 1,
                entry.name,
                entry.score,
                entry.formatted_time()
            )
        }));
        lines.join("\n")
    }
}

/// One line per change, with 1-based positions.
pub fn describe_change(change: &EntryChange) -> String {
    match change {
        EntryChange::Inserted { position, entry } => format!(
            "+ #{} {} ({} pts, {})",
            position + 1,
            entry.name,
            entry.score,
            entry.formatted_time()
        ),
        EntryChange::Removed { position, entry } => {
            format!("- #{} {}", position + 1, entry.name)
        }
        EntryChange::Changed {
            from,
            to,
            before,
            after,
        } => format!(
            "* {}: {} pts, {} -> {} pts, {} (#{} -> #{})",
            after.name,
            before.score,
            before.formatted_time(),
            after.score,
            after.formatted_time(),
            from + 1,
            to + 1
        ),
        EntryChange::Moved { from, to, entry } => {
            format!("~ {} moved #{} -> #{}", entry.name, from + 1, to + 1)
        }
    }
}
