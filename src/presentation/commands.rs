// Console command parsing - the UI controls of the terminal client
use crate::application::session::ControlEvent;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  select <index>        select a trajectory point (map click)
  deselect              clear the selection
  channel <index>       switch frequency channel
  vmin <dB> | vmax <dB> move a color-scale slider
  range <start> [end]   set the echogram time window (ISO times)
  clear-range           drop the time window
  generate              request the echogram now
  info                  dataset summary
  help                  this text
  quit                  exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Control(ControlEvent),
    Help,
    Empty,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("`{value}` is not a valid {expected}")]
    InvalidArgument { value: String, expected: &'static str },
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(Command::Empty);
    };

    let control = match name.to_ascii_lowercase().as_str() {
        "select" => ControlEvent::SelectPoint(integer(words.next(), "select", "a point index")?),
        "deselect" => ControlEvent::SelectPoint(-1),
        "channel" => ControlEvent::SetChannel(integer(words.next(), "channel", "a channel index")?),
        "vmin" => ControlEvent::SetVmin(number(words.next(), "vmin")?),
        "vmax" => ControlEvent::SetVmax(number(words.next(), "vmax")?),
        "range" => {
            let start = words.next().ok_or(CommandError::MissingArgument("range", "a start time"))?;
            ControlEvent::SetTimeRange {
                start: Some(start.to_string()),
                end: words.next().map(str::to_string),
            }
        }
        "clear-range" => ControlEvent::ClearTimeRange,
        "generate" => ControlEvent::Generate,
        "info" => ControlEvent::ShowInfo,
        "quit" | "exit" => ControlEvent::Quit,
        "help" | "?" => return Ok(Command::Help),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Command::Control(control))
}

fn integer(word: Option<&str>, command: &'static str, what: &'static str) -> Result<i64, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument(command, what))?;
    word.parse().map_err(|_| CommandError::InvalidArgument {
        value: word.to_string(),
        expected: "integer",
    })
}

fn number(word: Option<&str>, command: &'static str) -> Result<f64, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument(command, "a value in dB"))?;
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(CommandError::InvalidArgument {
            value: word.to_string(),
            expected: "number",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_controls() {
        assert_eq!(
            parse_command("select 42"),
            Ok(Command::Control(ControlEvent::SelectPoint(42)))
        );
        assert_eq!(
            parse_command("  VMIN -72.5 "),
            Ok(Command::Control(ControlEvent::SetVmin(-72.5)))
        );
        assert_eq!(
            parse_command("range 2020-01-01T00:00"),
            Ok(Command::Control(ControlEvent::SetTimeRange {
                start: Some("2020-01-01T00:00".into()),
                end: None,
            }))
        );
        assert_eq!(parse_command("deselect"), Ok(Command::Control(ControlEvent::SelectPoint(-1))));
        assert_eq!(parse_command(""), Ok(Command::Empty));
        assert_eq!(parse_command("help"), Ok(Command::Help));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_command("channel two"),
            Err(CommandError::InvalidArgument {
                value: "two".into(),
                expected: "integer"
            })
        );
        assert_eq!(
            parse_command("select"),
            Err(CommandError::MissingArgument("select", "a point index"))
        );
        assert!(matches!(parse_command("vmax NaN"), Err(CommandError::InvalidArgument { .. })));
        assert_eq!(parse_command("zoom 3"), Err(CommandError::Unknown("zoom".into())));
    }
}
