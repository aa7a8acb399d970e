use common::games::snake::{
    BoundaryMode, Direction, Intent, MAX_BOARD_SIZE, MIN_BOARD_SIZE, PlayMode, Skin, Theme,
};

/// One line of player input after normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    Intent(Intent),
    Save,
    Load,
    ClearSave,
    SetBoundary(BoundaryMode),
    SetPlayMode(PlayMode),
    SetBoardSize(usize),
    SetSkin(Skin),
    SetTheme(Theme),
    ToggleSound,
    ShowScores(Option<PlayMode>),
    Help,
    Quit,
}

fn choices<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

pub fn help_text() -> String {
    format!(
        "\
w/a/s/d or up/left/down/right  turn
p or space                     pause / resume
r                              restart
<enter> or start               start
save | load | clear            manage the saved game
boundary {}                    change boundary mode (restarts)
mode {}                        change play mode (restarts)
cells <{}..{}>                 change board size (restarts)
skin {}
theme {}
sound                          toggle sound
scores [mode]                  show high scores
quit",
        choices(BoundaryMode::ALL),
        choices(PlayMode::ALL),
        MIN_BOARD_SIZE,
        MAX_BOARD_SIZE,
        choices(Skin::ALL),
        choices(Theme::ALL),
    )
}

fn argument<'a>(command: &str, argument: Option<&'a str>) -> Result<&'a str, String> {
    argument.ok_or_else(|| format!("'{}' needs a value, try 'help'", command))
}

pub fn parse_command(line: &str) -> Result<ClientCommand, String> {
    // A lone space is the pause key, so only trim the line ending first.
    if line.trim_end_matches(['\r', '\n']) == " " {
        return Ok(ClientCommand::Intent(Intent::TogglePause));
    }

    let lowered = line.trim().to_ascii_lowercase();
    let mut words = lowered.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(ClientCommand::Intent(Intent::Start));
    };
    let value = words.next();

    let parsed = match command {
        "w" | "up" => ClientCommand::Intent(Intent::Turn(Direction::Up)),
        "a" | "left" => ClientCommand::Intent(Intent::Turn(Direction::Left)),
        "s" | "down" => ClientCommand::Intent(Intent::Turn(Direction::Down)),
        "d" | "right" => ClientCommand::Intent(Intent::Turn(Direction::Right)),
        "p" | "pause" => ClientCommand::Intent(Intent::TogglePause),
        "r" | "restart" => ClientCommand::Intent(Intent::Restart),
        "start" => ClientCommand::Intent(Intent::Start),
        "save" => ClientCommand::Save,
        "load" | "continue" => ClientCommand::Load,
        "clear" => ClientCommand::ClearSave,
        "boundary" => ClientCommand::SetBoundary(argument(command, value)?.parse()?),
        "mode" => ClientCommand::SetPlayMode(argument(command, value)?.parse()?),
        "cells" => {
            let text = argument(command, value)?;
            let size = text
                .parse()
                .map_err(|_| format!("Board size must be a number, got {:?}", text))?;
            ClientCommand::SetBoardSize(size)
        }
        "skin" => ClientCommand::SetSkin(argument(command, value)?.parse()?),
        "theme" => ClientCommand::SetTheme(argument(command, value)?.parse()?),
        "sound" => ClientCommand::ToggleSound,
        "scores" => ClientCommand::ShowScores(value.map(str::parse).transpose()?),
        "help" | "?" => ClientCommand::Help,
        "q" | "quit" | "exit" => ClientCommand::Quit,
        other => return Err(format!("Unknown command {:?}, try 'help'", other)),
    };
    Ok(parsed)
}
