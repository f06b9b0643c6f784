use std::fmt;

use game_types::RoundId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    RoundStarted {
        round_id: RoundId,
        word_length: usize,
    },
    WordReplaced {
        round_id: RoundId,
        word_length: usize,
    },
    GuessEvaluated {
        round_id: RoundId,
        guess: String,
        correct: bool,
        score: u32,
        attempts_left: u32,
    },
    HintAvailable {
        round_id: RoundId,
    },
    LetterChecked {
        round_id: RoundId,
        letter: char,
        count: u32,
    },
    WordLengthRevealed {
        round_id: RoundId,
        length: usize,
    },
    TipPurchased {
        round_id: RoundId,
    },
    RoundWon {
        round_id: RoundId,
        word: String,
        score: u32,
        elapsed_seconds: u64,
    },
    RoundOver {
        round_id: RoundId,
        word: String,
        final_score: u32,
    },
}

impl RoundEvent {
    pub fn round_id(&self) -> RoundId {
        match self {
            RoundEvent::RoundStarted { round_id, .. } => *round_id,
            RoundEvent::WordReplaced { round_id, .. } => *round_id,
            RoundEvent::GuessEvaluated { round_id, .. } => *round_id,
            RoundEvent::HintAvailable { round_id } => *round_id,
            RoundEvent::LetterChecked { round_id, .. } => *round_id,
            RoundEvent::WordLengthRevealed { round_id, .. } => *round_id,
            RoundEvent::TipPurchased { round_id } => *round_id,
            RoundEvent::RoundWon { round_id, .. } => *round_id,
            RoundEvent::RoundOver { round_id, .. } => *round_id,
        }
    }
}

/// Event handler trait for observing round state changes
pub trait RoundEventHandler: Send {
    fn handle_event(&mut self, event: RoundEvent);
}

/// Simple event bus for distributing round events
pub struct RoundEventBus {
    handlers: Vec<Box<dyn RoundEventHandler>>,
}

impl RoundEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn RoundEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: RoundEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for RoundEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RoundEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundEventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    struct TestHandler {
        events: Arc<Mutex<Vec<RoundEvent>>>,
    }

    impl RoundEventHandler for TestHandler {
        fn handle_event(&mut self, event: RoundEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_event_bus() {
        let mut bus = RoundEventBus::new();
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        bus.add_handler(Box::new(TestHandler {
            events: first.clone(),
        }));
        bus.add_handler(Box::new(TestHandler {
            events: second.clone(),
        }));
        assert_eq!(bus.handler_count(), 2);

        let round_id = Uuid::new_v4();
        bus.publish(RoundEvent::HintAvailable { round_id });

        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap().len(), 1);
        assert_eq!(first.lock().unwrap()[0].round_id(), round_id);
    }

    #[test]
    fn test_event_round_id() {
        let round_id = Uuid::new_v4();
        let event = RoundEvent::RoundOver {
            round_id,
            word: "apple".to_string(),
            final_score: 60,
        };
        assert_eq!(event.round_id(), round_id);
    }
}
