use std::time::Duration;

use common::games::snake::{GameSession, PlayMode};
use common::log;
use common::storage::KeyValueStore;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::command::{ClientCommand, help_text, parse_command};
use crate::render::{Effects, format_high_scores, render};

const SHAKE_DURATION: Duration = Duration::from_millis(300);
const SHAKE_MAGNITUDE: usize = 3;
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

fn draw<S: KeyValueStore>(
    session: &GameSession<S>,
    effects: &Effects,
    now: Duration,
    message: &str,
) {
    print!("{}{}", CLEAR_SCREEN, render(session.game(), effects, now));
    if !message.is_empty() {
        println!("{}", message);
    }
}

/// Applies a command and returns a message for the player, or `None` to quit.
fn apply_command<S: KeyValueStore>(
    session: &mut GameSession<S>,
    command: ClientCommand,
) -> Option<String> {
    let message = match command {
        ClientCommand::Intent(intent) => {
            session.handle_intent(intent);
            String::new()
        }
        ClientCommand::Save => match session.save() {
            Ok(()) => "Game saved".to_string(),
            Err(e) => format!("Save failed: {}", e),
        },
        ClientCommand::Load => match session.load_saved_game() {
            Ok(()) => "Saved game loaded, 'p' to resume".to_string(),
            Err(e) => format!("Load failed: {}", e),
        },
        ClientCommand::ClearSave => match session.clear_save() {
            Ok(()) => "Saved game cleared".to_string(),
            Err(e) => format!("Clear failed: {}", e),
        },
        ClientCommand::SetBoundary(mode) => report(session.set_boundary_mode(mode)),
        ClientCommand::SetPlayMode(mode) => report(session.set_play_mode(mode)),
        ClientCommand::SetBoardSize(size) => report(session.set_board_size(size)),
        ClientCommand::SetSkin(skin) => report(session.set_skin(skin)),
        ClientCommand::SetTheme(theme) => report(session.set_theme(theme)),
        ClientCommand::ToggleSound => match session.toggle_sound() {
            Ok(true) => "Sound on".to_string(),
            Ok(false) => "Sound off".to_string(),
            Err(e) => e,
        },
        ClientCommand::ShowScores(mode) => {
            let mode: PlayMode = mode.unwrap_or(session.preferences().play_mode);
            format_high_scores(mode, &session.high_scores(mode))
        }
        ClientCommand::Help => help_text(),
        ClientCommand::Quit => return None,
    };
    Some(message)
}

fn report(result: Result<(), String>) -> String {
    match result {
        Ok(()) => String::new(),
        Err(e) => e,
    }
}

/// Reads stdin on a plain thread so an interrupted run never waits on a pending read.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (line_tx, line_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let failed = line.is_err();
            if line_tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    line_rx
}

/// Frame loop: a fixed-rate interval drives the session while stdin lines become commands.
pub async fn run<S: KeyValueStore>(mut session: GameSession<S>, frame_delta: Duration) {
    let started = Instant::now();
    let mut frames = tokio::time::interval(frame_delta);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = UnboundedReceiverStream::new(spawn_stdin_reader());
    let mut effects = Effects::default();
    let mut message = String::from("Type 'help' for commands");
    let mut shown_second = u64::MAX;

    draw(&session, &effects, Duration::ZERO, &message);

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let now = started.elapsed();
                let was_shaking = effects.is_shaking(now);
                let report = session.frame(now);
                if report.game_over_reason().is_some() {
                    effects.trigger_shake(now, SHAKE_DURATION, SHAKE_MAGNITUDE);
                }

                let second = session.game().time_left().as_secs();
                let countdown_changed =
                    session.game().config().play_mode == PlayMode::Time && second != shown_second;
                if report.step.is_some()
                    || report.timed_out
                    || countdown_changed
                    || was_shaking
                    || effects.is_shaking(now)
                {
                    shown_second = second;
                    draw(&session, &effects, now, &message);
                }
            }
            line = lines.next() => {
                let Some(line) = line else {
                    break;
                };
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log!("Failed to read input: {}", e);
                        break;
                    }
                };

                message = match parse_command(&line) {
                    Ok(command) => match apply_command(&mut session, command) {
                        Some(message) => message,
                        None => break,
                    },
                    Err(e) => e,
                };
                draw(&session, &effects, started.elapsed(), &message);
            }
            _ = tokio::signal::ctrl_c() => {
                log!("Interrupted");
                break;
            }
        }
    }

    session.shutdown();
    log!("Session ended with score {}", session.game().score());
}
