//! Line-oriented front-end: name registration, main menu, game and leaderboard screens.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

use game_core::LeaderboardService;
use game_persistence::repositories::PreferenceRepository;
use game_types::{ClientCommand, PlayerName};

use crate::session::{SessionServices, SessionSettings, spawn_session};

pub mod input;
pub mod leaderboard_view;
pub mod render;

use input::{BoardInput, GameInput, MenuChoice, parse_game_input};
use leaderboard_view::{LOAD_FAILED, LeaderboardView, describe_change};
use render::{HELP, render_message};

const MENU: &str = "\n1) play  2) leaderboard  3) quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenExit {
    Back,
    EndOfInput,
}

pub struct Terminal<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Register a name if needed, then loop on the main menu until quit or end of input.
    pub async fn run(&mut self, services: &SessionServices, settings: &SessionSettings) -> Result<()> {
        let Some(name) = self.ensure_player_name(&services.preferences).await? else {
            return Ok(());
        };
        self.say(format!("Welcome, {}!", name))?;

        loop {
            self.say(MENU)?;
            let Some(line) = self.prompt("> ").await? else {
                return Ok(());
            };

            let exit = match MenuChoice::parse(&line) {
                Some(MenuChoice::Play) => self.play(services, settings).await?,
                Some(MenuChoice::Leaderboard) => {
                    self.leaderboard(services.leaderboard.as_ref()).await?
                }
                Some(MenuChoice::Quit) => return Ok(()),
                None => {
                    self.say("Choose play, leaderboard or quit.")?;
                    ScreenExit::Back
                }
            };

            if exit == ScreenExit::EndOfInput {
                return Ok(());
            }
        }
    }

    /// Saved name, or one asked for on first launch. `None` when input ends first.
    pub async fn ensure_player_name(
        &mut self,
        preferences: &PreferenceRepository,
    ) -> Result<Option<PlayerName>> {
        if let Some(name) = preferences.player_name().await? {
            return Ok(Some(name));
        }

        loop {
            let Some(line) = self.prompt("Enter your name: ").await? else {
                return Ok(None);
            };

            match PlayerName::parse(&line) {
                Ok(name) => {
                    preferences.save_player_name(&name).await?;
                    return Ok(Some(name));
                }
                Err(e) => self.say(e)?,
            }
        }
    }

    async fn play(&mut self, services: &SessionServices, settings: &SessionSettings) -> Result<ScreenExit> {
        let (handle, mut messages) = spawn_session(services.clone(), settings.clone());
        self.say(HELP)?;

        let mut exit = ScreenExit::Back;
        if handle.send(ClientCommand::StartRound).is_ok() {
            loop {
                tokio::select! {
                    message = messages.recv() => {
                        let Some(message) = message else { break };
                        if let Some(text) = render_message(&message) {
                            self.say(text)?;
                        }
                        if message.is_fatal() {
                            break;
                        }
                    }
                    line = self.lines.next_line() => {
                        let Some(line) = line? else {
                            exit = ScreenExit::EndOfInput;
                            break;
                        };

                        match parse_game_input(&line) {
                            GameInput::Command(command) => {
                                if handle.send(command).is_err() {
                                    break;
                                }
                            }
                            GameInput::Help => self.say(HELP)?,
                            GameInput::Quit => break,
                            GameInput::Empty => {}
                            GameInput::Unknown(input) => {
                                self.say(format!("Unknown command {}. Type /help.", input))?
                            }
                        }
                    }
                }
            }
        }

        handle.shutdown().await;
        Ok(exit)
    }

    async fn leaderboard(&mut self, service: &dyn LeaderboardService) -> Result<ScreenExit> {
        let mut view = LeaderboardView::default();

        self.say("Loading leaderboard...")?;
        match service.fetch().await {
            Ok(entries) => {
                view.apply(entries);
                self.say(view.render())?;
            }
            Err(e) => {
                warn!("Leaderboard fetch failed: {}", e);
                self.say(LOAD_FAILED)?;
            }
        }

        loop {
            let Some(line) = self.prompt("[r]efresh or [b]ack > ").await? else {
                return Ok(ScreenExit::EndOfInput);
            };

            match BoardInput::parse(&line) {
                Some(BoardInput::Back) => return Ok(ScreenExit::Back),
                Some(BoardInput::Refresh) => match service.fetch().await {
                    Ok(entries) => {
                        let changes = view.apply(entries);
                        if changes.is_empty() {
                            self.say("No changes.")?;
                        }
                        for change in &changes {
                            self.say(describe_change(change))?;
                        }
                        self.say(view.render())?;
                    }
                    Err(e) => {
                        warn!("Leaderboard refresh failed: {}", e);
                        self.say(LOAD_FAILED)?;
                    }
                },
                None => self.say("Type refresh or back.")?,
            }
        }
    }

    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(self.lines.next_line().await?)
    }

    fn say(&mut self, text: impl Display) -> std::io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }
}
