use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use game_types::{LeaderboardEntry, PlayerName, RemoteError};

/// Remote leaderboard: fire-and-forget writes, ordered reads.
#[async_trait]
pub trait LeaderboardService: Send + Sync {
    async fn submit(&self, name: &PlayerName, score: u32, seconds: u64) -> Result<(), RemoteError>;

    /// Entries in the order the service returned them.
    async fn fetch(&self) -> Result<Vec<LeaderboardEntry>, RemoteError>;
}

/// Row-level change between two board listings. Positions are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryChange {
    Inserted {
        position: usize,
        entry: LeaderboardEntry,
    },
    Removed {
        position: usize,
        entry: LeaderboardEntry,
    },
    Changed {
        from: usize,
        to: usize,
        before: LeaderboardEntry,
        after: LeaderboardEntry,
    },
    Moved {
        from: usize,
        to: usize,
        entry: LeaderboardEntry,
    },
}

impl EntryChange {
    pub fn name(&self) -> &str {
        match self {
            EntryChange::Inserted { entry, .. } => &entry.name,
            EntryChange::Removed { entry, .. } => &entry.name,
            EntryChange::Changed { after, .. } => &after.name,
            EntryChange::Moved { entry, .. } => &entry.name,
        }
    }
}

/// Minimal diff keyed by player name. Unchanged rows in place produce nothing.
///
/// Removals come first in old-list order, then one change per new row in new-list
/// order. Repeated names pair up with old rows of the same name in order.
pub fn diff_entries(old: &[LeaderboardEntry], new: &[LeaderboardEntry]) -> Vec<EntryChange> {
    let mut unmatched: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for (position, entry) in old.iter().enumerate() {
        unmatched
            .entry(entry.name.as_str())
            .or_default()
            .push_back(position);
    }

    let mut matched = vec![false; old.len()];
    let mut additions = Vec::new();

    for (to, entry) in new.iter().enumerate() {
        let Some(from) = unmatched
            .get_mut(entry.name.as_str())
            .and_then(|positions| positions.pop_front())
        else {
            additions.push(EntryChange::Inserted {
                position: to,
                entry: entry.clone(),
            });
            continue;
        };

        matched[from] = true;
        let before = &old[from];
        if !before.same_content(entry) {
            additions.push(EntryChange::Changed {
                from,
                to,
                before: before.clone(),
                after: entry.clone(),
            });
        } else if from != to {
            additions.push(EntryChange::Moved {
                from,
                to,
                entry: entry.clone(),
            });
        }
    }

    let mut changes: Vec<EntryChange> = old
        .iter()
        .enumerate()
        .filter(|(position, _)| !matched[*position])
        .map(|(position, entry)| EntryChange::Removed {
            position,
            entry: entry.clone(),
        })
        .collect();

    changes.extend(additions);
    changes
}
