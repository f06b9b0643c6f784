//! Single-owner game session.
//!
//! One tokio task owns the [`RoundMachine`]. User commands, background network results
//! and clock ticks all arrive on that task through one `select!` loop, so round state is
//! never touched from two places at once. Network work runs in a [`JoinSet`] owned by the
//! session; shutting the session down aborts whatever is still in flight.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use game_core::economy::HINT_UNLOCK_GUESSES;
use game_core::{
    AcquiredWord, Connectivity, LeaderboardService, RetryPolicy, RoundEvent, RoundEventHandler,
    RoundMachine, SynonymFilter, SynonymValidator, WordAcquirer, WordSource,
};
use game_persistence::repositories::PreferenceRepository;
use game_types::{
    AcquisitionFailure, ClientCommand, GameError, PlayerName, RemoteError, RoundId, RoundPhase,
    SessionMessage,
};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::Config;

pub const TIP_OFFLINE_NOTICE: &str = "Internet connection required for tips";
pub const NO_SYNONYMS_NOTICE: &str = "No valid synonyms for this word";
pub const NAME_MISSING_NOTICE: &str = "Set a player name to post scores";
pub const SUBMIT_FAILED_NOTICE: &str = "Failed to submit score";
pub const ROUND_RUNNING_NOTICE: &str = "A round is already in progress";

/// Remote collaborators and storage the session talks to.
#[derive(Clone)]
pub struct SessionServices {
    pub words: Arc<dyn WordSource>,
    pub leaderboard: Arc<dyn LeaderboardService>,
    pub connectivity: Arc<dyn Connectivity>,
    pub preferences: Arc<PreferenceRepository>,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub tick_interval: Duration,
    pub retry_policy: RetryPolicy,
    /// Fetch a fresh word when a tip finds no synonyms.
    pub replace_word_on_empty_tip: bool,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tick_interval: config.tick_interval(),
            retry_policy: config.retry_policy(),
            replace_word_on_empty_tip: config.replace_word_on_empty_tip,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            retry_policy: RetryPolicy::default(),
            replace_word_on_empty_tip: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Game session has ended")]
pub struct SessionClosed;

enum SessionCommand {
    Client(ClientCommand),
    Shutdown(oneshot::Sender<()>),
}

/// Front-end side of a running session.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub fn send(&self, command: ClientCommand) -> Result<(), SessionClosed> {
        self.commands
            .send(SessionCommand::Client(command))
            .map_err(|_| SessionClosed)
    }

    /// Stop the clock, abort in-flight requests and wait for the session task to exit.
    pub async fn shutdown(self) {
        let (reply, done) = oneshot::channel();
        if self.commands.send(SessionCommand::Shutdown(reply)).is_ok() {
            let _ = done.await;
        }

        if let Err(e) = self.task.await {
            warn!("Session task ended abnormally: {}", e);
        }
    }
}

pub fn spawn_session(
    services: SessionServices,
    settings: SessionSettings,
) -> (SessionHandle, mpsc::UnboundedReceiver<SessionMessage>) {
    let (command_sender, command_receiver) = mpsc::unbounded_channel();
    let (message_sender, message_receiver) = mpsc::unbounded_channel();

    let session = Session::new(services, settings, message_sender);
    let task = tokio::spawn(session.run(command_receiver));

    (
        SessionHandle {
            commands: command_sender,
            task,
        },
        message_receiver,
    )
}

// Round events are queued here and drained on the session task after each mutation.
struct EventForwarder {
    events: mpsc::UnboundedSender<RoundEvent>,
}

impl RoundEventHandler for EventForwarder {
    fn handle_event(&mut self, event: RoundEvent) {
        let _ = self.events.send(event);
    }
}

#[derive(Debug, Clone, Copy)]
enum Acquisition {
    NewRound,
    Replace { round_id: RoundId },
}

enum TaskOutcome {
    WordAcquired {
        epoch: u64,
        acquisition: Acquisition,
        result: Result<AcquiredWord, AcquisitionFailure>,
    },
    TipFetched {
        round_id: RoundId,
        result: Result<Vec<String>, RemoteError>,
    },
    TipOffline {
        round_id: RoundId,
    },
    ScorePosted {
        name: PlayerName,
        score: u32,
        seconds: u64,
    },
    ScoreSkipped,
    ScoreFailed {
        message: String,
    },
}

struct Session {
    machine: RoundMachine,
    events: mpsc::UnboundedReceiver<RoundEvent>,
    messages: mpsc::UnboundedSender<SessionMessage>,
    acquirer: WordAcquirer,
    validator: SynonymValidator,
    services: SessionServices,
    settings: SessionSettings,
    tasks: JoinSet<TaskOutcome>,
    ticker: Option<Interval>,
    acquisition_epoch: u64,
    pending_acquisition: Option<u64>,
}

impl Session {
    fn new(
        services: SessionServices,
        settings: SessionSettings,
        messages: mpsc::UnboundedSender<SessionMessage>,
    ) -> Self {
        let (event_sender, events) = mpsc::unbounded_channel();
        let mut machine = RoundMachine::new();
        machine.add_handler(Box::new(EventForwarder {
            events: event_sender,
        }));

        let acquirer = WordAcquirer::new(
            services.words.clone(),
            services.connectivity.clone(),
            settings.retry_policy.clone(),
        );

        Self {
            machine,
            events,
            messages,
            acquirer,
            validator: SynonymValidator::new(services.words.clone()),
            services,
            settings,
            tasks: JoinSet::new(),
            ticker: None,
            acquisition_epoch: 0,
            pending_acquisition: None,
        }
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) {
        info!("Game session started");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Client(command)) => self.handle_command(command),
                    Some(SessionCommand::Shutdown(reply)) => {
                        self.teardown().await;
                        let _ = reply.send(());
                        return;
                    }
                    None => break,
                },
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => match joined {
                    Ok(outcome) => self.handle_outcome(outcome),
                    Err(e) if e.is_cancelled() => debug!("Background task cancelled"),
                    Err(e) => warn!("Background task failed: {}", e),
                },
                _ = next_tick(&mut self.ticker) => self.handle_tick(),
            }

            self.drain_events();
        }

        self.teardown().await;
    }

    fn handle_command(&mut self, command: ClientCommand) {
        if self.pending_acquisition.is_some() && command != ClientCommand::Status {
            self.emit(SessionMessage::Rejected {
                error: GameError::WordPending,
            });
            return;
        }

        let result = match command {
            ClientCommand::StartRound => {
                self.start_round();
                Ok(())
            }
            ClientCommand::SubmitGuess { text } => self.machine.submit_guess(&text).map(|_| ()),
            ClientCommand::CheckLetter { input } => self.machine.check_letter(&input).map(|_| ()),
            ClientCommand::RevealWordLength => self.machine.reveal_word_length().map(|_| ()),
            ClientCommand::RequestTip => self.request_tip(),
            ClientCommand::Status => {
                self.emit(SessionMessage::StateUpdate {
                    state: self.machine.snapshot(),
                });
                Ok(())
            }
        };

        if let Err(error) = result {
            debug!("Command rejected: {}", error);
            self.emit(SessionMessage::Rejected { error });
        }
    }

    fn start_round(&mut self) {
        if self.machine.phase() == RoundPhase::InProgress {
            self.emit(SessionMessage::Notice {
                message: ROUND_RUNNING_NOTICE.to_string(),
            });
            return;
        }

        self.stop_clock();
        self.begin_acquisition(Acquisition::NewRound);
    }

    fn request_tip(&mut self) -> Result<(), GameError> {
        let snapshot = self.machine.snapshot();
        if snapshot.phase == RoundPhase::InProgress && !snapshot.solved && !snapshot.hint_available
        {
            return Err(GameError::TipLocked {
                required: HINT_UNLOCK_GUESSES,
            });
        }

        // Points are spent before the lookup, whatever it returns.
        let request = self.machine.request_tip()?;
        let connectivity = self.services.connectivity.clone();
        let validator = self.validator.clone();

        self.tasks.spawn(async move {
            if !connectivity.is_online().await {
                return TaskOutcome::TipOffline {
                    round_id: request.round_id,
                };
            }

            TaskOutcome::TipFetched {
                round_id: request.round_id,
                result: validator.validate(&request.word).await,
            }
        });

        Ok(())
    }

    fn begin_acquisition(&mut self, acquisition: Acquisition) {
        self.acquisition_epoch += 1;
        let epoch = self.acquisition_epoch;
        self.pending_acquisition = Some(epoch);

        let acquirer = self.acquirer.clone();
        self.tasks.spawn(async move {
            TaskOutcome::WordAcquired {
                epoch,
                acquisition,
                result: acquirer.acquire().await,
            }
        });

        self.emit(SessionMessage::FetchingWord);
    }

    fn submit_score(&mut self, score: u32, seconds: u64) {
        let preferences = self.services.preferences.clone();
        let leaderboard = self.services.leaderboard.clone();

        self.tasks.spawn(async move {
            let name = match preferences.player_name().await {
                Ok(Some(name)) => name,
                Ok(None) => return TaskOutcome::ScoreSkipped,
                Err(e) => {
                    return TaskOutcome::ScoreFailed {
                        message: e.to_string(),
                    };
                }
            };

            match leaderboard.submit(&name, score, seconds).await {
                Ok(()) => TaskOutcome::ScorePosted {
                    name,
                    score,
                    seconds,
                },
                Err(e) => TaskOutcome::ScoreFailed {
                    message: e.to_string(),
                },
            }
        });
    }

    fn handle_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::WordAcquired {
                epoch,
                acquisition,
                result,
            } => self.finish_acquisition(epoch, acquisition, result),
            TaskOutcome::TipFetched { round_id, result } => self.finish_tip(round_id, result),
            TaskOutcome::TipOffline { round_id } => {
                if self.machine.is_current(round_id) {
                    self.notice(TIP_OFFLINE_NOTICE);
                }
            }
            TaskOutcome::ScorePosted {
                name,
                score,
                seconds,
            } => {
                info!("Score {} posted", score);
                self.emit(SessionMessage::ScoreSubmitted {
                    name: name.to_string(),
                    score,
                    seconds,
                });
            }
            TaskOutcome::ScoreSkipped => {
                warn!("No player name saved, score not posted");
                self.notice(NAME_MISSING_NOTICE);
            }
            TaskOutcome::ScoreFailed { message } => {
                warn!("Score submission failed: {}", message);
                self.notice(SUBMIT_FAILED_NOTICE);
            }
        }
    }

    fn finish_acquisition(
        &mut self,
        epoch: u64,
        acquisition: Acquisition,
        result: Result<AcquiredWord, AcquisitionFailure>,
    ) {
        if self.pending_acquisition != Some(epoch) {
            debug!("Dropping word from superseded request {}", epoch);
            return;
        }
        self.pending_acquisition = None;

        let acquired = match result {
            Ok(acquired) => acquired,
            Err(failure) => {
                warn!("Word acquisition failed: {}", failure);
                self.stop_clock();
                self.emit(SessionMessage::Fatal {
                    reason: failure.to_string(),
                });
                return;
            }
        };

        match acquisition {
            Acquisition::NewRound => {
                self.machine.start(&acquired.word);
                self.start_clock();
            }
            Acquisition::Replace { round_id } => {
                if !self.machine.is_current(round_id) {
                    debug!("Round {} moved on, dropping replacement word", round_id);
                    return;
                }
                if let Err(e) = self.machine.replace_word(&acquired.word) {
                    warn!("Could not replace word: {}", e);
                }
            }
        }
    }

    fn finish_tip(&mut self, round_id: RoundId, result: Result<Vec<String>, RemoteError>) {
        if !self.machine.is_current(round_id) {
            debug!("Dropping tip for stale round {}", round_id);
            return;
        }

        let valid = match result {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Tip lookup failed: {}", e);
                self.notice(format!("Could not fetch a tip: {}", e));
                return;
            }
        };

        if let Some(synonym) = SynonymFilter::pick(&valid, &mut rand::thread_rng()) {
            self.emit(SessionMessage::SynonymTip {
                synonym: synonym.clone(),
            });
            return;
        }

        self.notice(NO_SYNONYMS_NOTICE);
        let snapshot = self.machine.snapshot();
        if self.settings.replace_word_on_empty_tip
            && snapshot.phase == RoundPhase::InProgress
            && !snapshot.solved
        {
            info!("Replacing word {} after empty tip", round_id);
            self.begin_acquisition(Acquisition::Replace { round_id });
        }
    }

    fn handle_tick(&mut self) {
        match self.machine.tick() {
            Some(elapsed_seconds) => self.emit(SessionMessage::ClockTick { elapsed_seconds }),
            None => self.stop_clock(),
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.present(event);
        }
    }

    fn present(&mut self, event: RoundEvent) {
        let state = self.machine.snapshot();

        match event {
            RoundEvent::RoundStarted { .. } => self.emit(SessionMessage::RoundStarted { state }),
            RoundEvent::WordReplaced { .. } => self.emit(SessionMessage::WordReplaced { state }),
            RoundEvent::GuessEvaluated { guess, correct, .. } => {
                self.emit(SessionMessage::GuessResult {
                    guess,
                    correct,
                    state,
                })
            }
            RoundEvent::HintAvailable { .. } => self.emit(SessionMessage::HintAvailable),
            RoundEvent::LetterChecked { letter, count, .. } => {
                self.emit(SessionMessage::LetterChecked {
                    letter,
                    count,
                    state,
                })
            }
            RoundEvent::WordLengthRevealed { length, .. } => {
                self.emit(SessionMessage::WordLength { length, state })
            }
            RoundEvent::TipPurchased { .. } => self.emit(SessionMessage::StateUpdate { state }),
            RoundEvent::RoundWon {
                word,
                score,
                elapsed_seconds,
                ..
            } => {
                self.stop_clock();
                self.emit(SessionMessage::RoundWon {
                    word,
                    score,
                    elapsed_seconds,
                });
                self.submit_score(score, elapsed_seconds);

                // A win on the last attempt ends the round instead of dealing a new word.
                if state.phase == RoundPhase::InProgress {
                    self.begin_acquisition(Acquisition::NewRound);
                }
            }
            RoundEvent::RoundOver {
                word, final_score, ..
            } => {
                self.stop_clock();
                self.emit(SessionMessage::RoundOver { word, final_score });
            }
        }
    }

    fn start_clock(&mut self) {
        let period = self.settings.tick_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }

    fn stop_clock(&mut self) {
        self.ticker = None;
    }

    fn notice(&self, message: impl Into<String>) {
        self.emit(SessionMessage::Notice {
            message: message.into(),
        });
    }

    fn emit(&self, message: SessionMessage) {
        if self.messages.send(message).is_err() {
            debug!("Front-end gone, dropping session message");
        }
    }

    async fn teardown(&mut self) {
        self.stop_clock();
        self.pending_acquisition = None;
        self.tasks.shutdown().await;
        info!("Game session ended");
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending::<()>().await,
    }
}
