//! Session command handler
//!
//! Drives a mounted place input from line commands, one per line, and
//! renders the view after each. Reads a script file or stdin.
//!
//! Commands: `type <text>`, `set <text>`, `back`, `clear`, `down`, `up`,
//! `enter`, `esc`, `focus`, `blur`, `click <row>`, `wait`, `show`, `quit`.
//! Blank lines and lines starting with `#` are skipped.

use crate::cli::{Context, WeightArgs};
use crate::error::{Error, Result};
use crate::format::ViewRenderer;
use crate::geo::{Geocoder, SuggestionProvider};
use crate::widget::{Event, Key, PlaceInput};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Session command arguments
#[derive(Args)]
pub struct SessionArgs {
    /// Read commands from this file instead of stdin
    #[arg(long, short = 's')]
    pub script: Option<PathBuf>,

    /// Don't wait for provider calls after each command (use `wait`)
    #[arg(long)]
    pub no_wait: bool,

    #[command(flatten)]
    pub weight: WeightArgs,
}

/// One session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Keystrokes appended to what the field shows
    Type(String),
    /// Replace the field contents
    Set(String),
    /// Delete the last character
    Backspace,
    Key(Key),
    Focus,
    Blur,
    /// Mouse-down on a row, 1-based as displayed
    Click(usize),
    Wait,
    Show,
    Quit,
}

/// Parse one line; `None` for blank lines and comments
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "type" => Command::Type(rest.to_string()),
        "set" => Command::Set(rest.to_string()),
        "clear" => Command::Set(String::new()),
        "back" | "backspace" => Command::Backspace,
        "down" => Command::Key(Key::ArrowDown),
        "up" => Command::Key(Key::ArrowUp),
        "enter" => Command::Key(Key::Enter),
        "esc" | "escape" => Command::Key(Key::Escape),
        "focus" => Command::Focus,
        "blur" => Command::Blur,
        "click" => {
            let row: usize = rest.trim().parse().map_err(|_| {
                Error::Config(format!("click needs a row number, got '{}'", rest.trim()))
            })?;
            if row == 0 {
                return Err(Error::Config("rows are numbered from 1".to_string()));
            }
            Command::Click(row)
        }
        "wait" => Command::Wait,
        "show" => Command::Show,
        "quit" | "exit" => Command::Quit,
        other => return Err(Error::Config(format!("Unknown session command: {}", other))),
    };

    Ok(Some(command))
}

/// Play one command against the widget, as the text field would deliver it
///
/// Returns `false` when the session should end.
pub async fn apply<P, G>(widget: &mut PlaceInput<P, G>, command: Command) -> bool
where
    P: SuggestionProvider + 'static,
    G: Geocoder + 'static,
{
    match command {
        Command::Type(text) => {
            // The field shows the highlighted suggestion, and typing edits that
            let mut value = widget.view().display_value;
            for c in text.chars() {
                value.push(c);
                widget.handle(Event::KeyDown(Key::Other));
                widget.handle(Event::Change(value.clone()));
            }
        }
        Command::Set(text) => {
            widget.handle(Event::KeyDown(Key::Other));
            widget.handle(Event::Change(text));
        }
        Command::Backspace => {
            let mut value = widget.view().display_value;
            widget.handle(Event::KeyDown(Key::Other));
            if value.pop().is_some() {
                widget.handle(Event::Change(value));
            }
        }
        Command::Key(key) => {
            let reaction = widget.handle(Event::KeyDown(key));
            if reaction.blurs() {
                widget.handle(Event::Blur);
            }
        }
        Command::Focus => {
            widget.handle(Event::Focus);
        }
        Command::Blur => {
            widget.handle(Event::Blur);
        }
        Command::Click(row) => {
            widget.handle(Event::RowMouseDown(row - 1));
        }
        Command::Wait => widget.settle_all().await,
        Command::Show => {}
        Command::Quit => return false,
    }
    true
}

/// Run commands from `reader` until it ends or `quit`, rendering to `out`
pub async fn play<P, G, R, W>(
    widget: &mut PlaceInput<P, G>,
    reader: R,
    renderer: &dyn ViewRenderer,
    out: &mut W,
    wait: bool,
) -> Result<()>
where
    P: SuggestionProvider + 'static,
    G: Geocoder + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };
        debug!(?command, "session command");

        if !apply(widget, command).await {
            break;
        }
        if wait {
            widget.settle_all().await;
        } else {
            widget.pump();
        }

        write!(out, "{}", renderer.render(&widget.view())?)?;
        out.flush()?;
    }

    Ok(())
}

/// Run the session command
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    let options = args.weight.apply(&ctx.config)?;
    let renderer = ctx.renderer()?;
    let backend = ctx.backend()?;
    info!(backend = backend.name(), "starting session");

    let autofocus = options.autofocus;
    let mut widget = PlaceInput::new(options, backend.clone(), backend)?;
    if autofocus {
        widget.handle(Event::Focus);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let wait = !args.no_wait;

    match args.script {
        Some(path) => {
            let file = tokio::fs::File::open(&path).await?;
            play(&mut widget, BufReader::new(file), renderer.as_ref(), &mut out, wait).await
        }
        None => {
            let stdin = tokio::io::stdin();
            play(&mut widget, BufReader::new(stdin), renderer.as_ref(), &mut out, wait).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::format::text::TextRenderer;
    use crate::geo::memory::MemoryBackend;
    use crate::resolve::Resolution;
    use crate::widget::WidgetOptions;

    fn widget() -> PlaceInput<MemoryBackend, MemoryBackend> {
        let backend = MemoryBackend::with_sample_places();
        PlaceInput::new(WidgetOptions::default(), backend.clone(), backend).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("type 10 Down").unwrap(),
            Some(Command::Type("10 Down".to_string()))
        );
        assert_eq!(parse_command("DOWN").unwrap(), Some(Command::Key(Key::ArrowDown)));
        assert_eq!(parse_command("esc").unwrap(), Some(Command::Key(Key::Escape)));
        assert_eq!(parse_command("click 2").unwrap(), Some(Command::Click(2)));
        assert_eq!(parse_command("clear").unwrap(), Some(Command::Set(String::new())));
        assert_eq!(parse_command("  # comment").unwrap(), None);
        assert_eq!(parse_command("").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("click").is_err());
        assert!(parse_command("click 0").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[tokio::test]
    async fn test_type_edits_highlighted_text() {
        let mut widget = widget();
        widget.handle(Event::Focus);
        apply(&mut widget, Command::Set("Lon".to_string())).await;
        widget.settle_all().await;
        apply(&mut widget, Command::Key(Key::ArrowDown)).await;

        apply(&mut widget, Command::Type("!".to_string())).await;
        let state = widget.state();
        assert_eq!(state.input_text, "10 Downing Street, London, United Kingdom!");
        assert_eq!(state.active, None);
    }

    #[tokio::test]
    async fn test_escape_blurs_without_clearing() {
        let mut widget = widget();
        widget.handle(Event::Focus);
        apply(&mut widget, Command::Set("Paris".to_string())).await;
        widget.settle_all().await;

        apply(&mut widget, Command::Key(Key::Escape)).await;
        let state = widget.state();
        assert!(!state.interested);
        assert_eq!(state.input_text, "Paris");
        assert_eq!(state.suggestions.len(), 2);
    }

    #[tokio::test]
    async fn test_play_script() {
        let mut widget = widget();
        let script = "focus\ntype 10 Down\ndown\nenter\n";
        let mut out = Vec::new();

        play(&mut widget, script.as_bytes(), &TextRenderer, &mut out, true)
            .await
            .unwrap();

        assert_eq!(
            widget.location(),
            Resolution::Resolved(Coordinates::new(51.5034, -0.1276))
        );
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("> 1. 10 Downing Street, London, United Kingdom"));
        assert!(output.ends_with("location: 51.503400, -0.127600\n"));
    }

    #[tokio::test]
    async fn test_play_reports_bad_lines_and_stops_at_quit() {
        let mut widget = widget();
        let script = "dance\nquit\nfocus\n";
        let mut out = Vec::new();

        play(&mut widget, script.as_bytes(), &TextRenderer, &mut out, true)
            .await
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("error: "));
        assert!(!widget.state().interested);
    }
}
