use game_types::ClientCommand;

/// One line typed on the game screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameInput {
    Command(ClientCommand),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Anything not starting with `/` is a guess.
pub fn parse_game_input(line: &str) -> GameInput {
    let line = line.trim();
    if line.is_empty() {
        return GameInput::Empty;
    }

    let Some(command) = line.strip_prefix('/') else {
        return GameInput::Command(ClientCommand::SubmitGuess {
            text: line.to_string(),
        });
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "letter" | "l" => GameInput::Command(ClientCommand::CheckLetter {
            input: argument.to_string(),
        }),
        "length" => GameInput::Command(ClientCommand::RevealWordLength),
        "tip" => GameInput::Command(ClientCommand::RequestTip),
        "new" => GameInput::Command(ClientCommand::StartRound),
        "status" => GameInput::Command(ClientCommand::Status),
        "help" | "?" => GameInput::Help,
        "quit" | "q" => GameInput::Quit,
        _ => GameInput::Unknown(line.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Play,
    Leaderboard,
    Quit,
}

impl MenuChoice {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "1" | "p" | "play" => Some(MenuChoice::Play),
            "2" | "l" | "leaderboard" => Some(MenuChoice::Leaderboard),
            "3" | "q" | "quit" | "exit" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardInput {
    Refresh,
    Back,
}

impl BoardInput {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "r" | "refresh" => Some(BoardInput::Refresh),
            "" | "b" | "back" | "q" => Some(BoardInput::Back),
            _ => None,
        }
    }
}
