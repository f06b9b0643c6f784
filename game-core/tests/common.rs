#![allow(dead_code)]

use async_trait::async_trait;
use game_core::{Connectivity, RoundEvent, RoundEventHandler, RoundMachine, WordSource};
use game_types::RemoteError;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Creates a machine with a round already started on `word`
pub fn started_machine(word: &str) -> RoundMachine {
    let mut machine = RoundMachine::new();
    machine.start(word);
    machine
}

/// Creates a machine wired to an event collector
pub fn machine_with_collector() -> (RoundMachine, EventCollector) {
    let collector = EventCollector::new();
    let mut machine = RoundMachine::new();
    machine.add_handler(Box::new(collector.clone()));
    (machine, collector)
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<RoundEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<RoundEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn count(&self, check_fn: impl Fn(&RoundEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&RoundEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl RoundEventHandler for EventCollector {
    fn handle_event(&mut self, event: RoundEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Word source that replays a fixed script of responses
pub struct ScriptedWordSource {
    words: Mutex<VecDeque<Result<String, RemoteError>>>,
    synonyms: Mutex<HashMap<String, Result<Vec<String>, RemoteError>>>,
    word_calls: AtomicU32,
    synonym_calls: AtomicU32,
}

impl ScriptedWordSource {
    pub fn new() -> Self {
        Self {
            words: Mutex::new(VecDeque::new()),
            synonyms: Mutex::new(HashMap::new()),
            word_calls: AtomicU32::new(0),
            synonym_calls: AtomicU32::new(0),
        }
    }

    pub fn with_words(self, words: &[&str]) -> Self {
        {
            let mut queue = self.words.lock().unwrap();
            for word in words {
                queue.push_back(Ok(word.to_string()));
            }
        }
        self
    }

    pub fn with_word_error(self, error: RemoteError) -> Self {
        self.words.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_synonyms(self, word: &str, synonyms: &[&str]) -> Self {
        self.synonyms.lock().unwrap().insert(
            word.to_string(),
            Ok(synonyms.iter().map(|s| s.to_string()).collect()),
        );
        self
    }

    pub fn with_synonym_error(self, word: &str, error: RemoteError) -> Self {
        self.synonyms
            .lock()
            .unwrap()
            .insert(word.to_string(), Err(error));
        self
    }

    pub fn word_calls(&self) -> u32 {
        self.word_calls.load(Ordering::SeqCst)
    }

    pub fn synonym_calls(&self) -> u32 {
        self.synonym_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WordSource for ScriptedWordSource {
    async fn random_word(&self) -> Result<String, RemoteError> {
        self.word_calls.fetch_add(1, Ordering::SeqCst);
        self.words
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RemoteError::Status { status: 503 }))
    }

    async fn synonyms(&self, word: &str) -> Result<Vec<String>, RemoteError> {
        self.synonym_calls.fetch_add(1, Ordering::SeqCst);
        self.synonyms
            .lock()
            .unwrap()
            .get(word)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Connectivity probe that can be switched off mid-test
pub struct SwitchableConnectivity {
    online: AtomicBool,
}

impl SwitchableConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

#[async_trait]
impl Connectivity for SwitchableConnectivity {
    async fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
