use std::fmt;
use std::str::FromStr;

use learn_core::model::DiagramRegion;

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Status,
    Show,
    Read,
    /// One-based option number as typed by the learner.
    Pick(usize),
    Submit,
    Toggle(DiagramRegion),
    Hint,
    Complete,
    Next,
    Prev,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str },
    InvalidOption { raw: String },
    InvalidRegion { raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type a command (help lists them)"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw}"),
            CommandError::MissingArgument { command } => {
                write!(f, "{command} requires an argument")
            }
            CommandError::InvalidOption { raw } => write!(f, "invalid option number: {raw}"),
            CommandError::InvalidRegion { raw } => write!(
                f,
                "unknown region: {raw} (one of {})",
                DiagramRegion::ALL.map(DiagramRegion::as_str).join(", ")
            ),
        }
    }
}

impl std::error::Error for CommandError {}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let arg = words.next();

        let command = match head.to_ascii_lowercase().as_str() {
            "status" | "s" => Command::Status,
            "show" | "l" => Command::Show,
            "read" | "r" => Command::Read,
            "pick" | "p" => {
                let raw = arg.ok_or(CommandError::MissingArgument { command: "pick" })?;
                let number = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| CommandError::InvalidOption { raw: raw.to_owned() })?;
                Command::Pick(number)
            }
            "submit" => Command::Submit,
            "toggle" | "t" => {
                let raw = arg.ok_or(CommandError::MissingArgument { command: "toggle" })?;
                let region = raw
                    .parse()
                    .map_err(|_| CommandError::InvalidRegion { raw: raw.to_owned() })?;
                Command::Toggle(region)
            }
            "hint" => Command::Hint,
            "complete" | "c" => Command::Complete,
            "next" | "n" => Command::Next,
            "prev" | "b" => Command::Prev,
            "reset" => Command::Reset,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_owned())),
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
Commands:
  status            progress, coins and time remaining
  show              print the current lesson
  read              mark the lesson content as read
  pick <n>          choose quiz option n
  submit            submit the quiz answer or diagram selection
  toggle <region>   select or deselect a diagram region
  hint              show or hide the diagram hint
  complete          complete the current lesson
  next, prev        move between lessons
  reset             erase all progress
  help, quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commands_and_aliases() {
        assert_eq!("status".parse(), Ok(Command::Status));
        assert_eq!("  NEXT ".parse(), Ok(Command::Next));
        assert_eq!("q".parse(), Ok(Command::Quit));
        assert_eq!("complete".parse(), Ok(Command::Complete));
    }

    #[test]
    fn pick_takes_a_one_based_number() {
        assert_eq!("pick 2".parse(), Ok(Command::Pick(2)));
        assert_eq!(
            "pick".parse::<Command>(),
            Err(CommandError::MissingArgument { command: "pick" })
        );
        assert_eq!(
            "pick 0".parse::<Command>(),
            Err(CommandError::InvalidOption { raw: "0".into() })
        );
    }

    #[test]
    fn toggle_takes_a_region_name() {
        assert_eq!(
            "toggle Roof".parse(),
            Ok(Command::Toggle(DiagramRegion::Roof))
        );
        assert!(matches!(
            "toggle attic".parse::<Command>(),
            Err(CommandError::InvalidRegion { .. })
        ));
    }

    #[test]
    fn empty_and_unknown_lines_are_errors() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".into()))
        );
    }
}
