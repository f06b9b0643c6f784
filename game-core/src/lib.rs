pub mod acquisition;
pub mod economy;
pub mod game_events;
pub mod game_state;
pub mod leaderboard;
pub mod synonyms;

// Re-export main components
pub use acquisition::*;
pub use economy::HintEconomy;
pub use game_events::*;
pub use game_state::*;
pub use leaderboard::*;
pub use synonyms::*;
