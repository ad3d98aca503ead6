use std::str::FromStr;

use mineboard_core::{Coord, Coord2, Difficulty, GameError};
use thiserror::Error;

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Reveal(Coord2),
    Mark(Coord2),
    Tap(Coord2),
    ToggleMode,
    Show,
    New {
        size: Option<Coord>,
        difficulty: Option<Difficulty>,
    },
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command {0:?}, try \"help\"")]
    Unknown(String),
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("Not a number: {0:?}")]
    InvalidNumber(String),
    #[error("Unexpected argument {0:?}")]
    TrailingArgument(String),
    #[error(transparent)]
    Difficulty(#[from] GameError),
}

pub const HELP: &str = "\
commands:
  r X Y                  reveal the cell at column X, row Y
  m X Y                  toggle the mark on a cell
  t X Y                  tap a cell using the current mode
  mode                   switch between reveal and mark mode
  show                   print the board
  new [SIZE [DIFFICULTY]] start over, optionally with a new size or difficulty
  help                   print this help
  q                      quit";

fn number(arg: Option<&str>, name: &'static str) -> Result<Coord, ParseError> {
    let arg = arg.ok_or(ParseError::MissingArgument(name))?;
    arg.parse()
        .map_err(|_| ParseError::InvalidNumber(arg.to_string()))
}

fn coords<'a>(args: &mut impl Iterator<Item = &'a str>) -> Result<Coord2, ParseError> {
    let x = number(args.next(), "column")?;
    let y = number(args.next(), "row")?;
    Ok(Coord2::new(x, y))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut args = line.split_whitespace();
        let name = args.next().ok_or(ParseError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Command::Reveal(coords(&mut args)?),
            "m" | "mark" | "f" | "flag" => Command::Mark(coords(&mut args)?),
            "t" | "tap" => Command::Tap(coords(&mut args)?),
            "mode" => Command::ToggleMode,
            "s" | "show" => Command::Show,
            "n" | "new" => {
                let size = args.next().map(|arg| number(Some(arg), "size")).transpose()?;
                let difficulty = args.next().map(str::parse).transpose()?;
                Command::New { size, difficulty }
            }
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(ParseError::Unknown(name.to_string())),
        };

        match args.next() {
            Some(extra) => Err(ParseError::TrailingArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use mineboard_core::ConfigError;

    use super::*;

    #[test]
    fn parses_cell_commands() {
        assert_eq!("r 1 2".parse(), Ok(Command::Reveal(Coord2::new(1, 2))));
        assert_eq!("  M 0 3 ".parse(), Ok(Command::Mark(Coord2::new(0, 3))));
        assert_eq!("tap -1 4".parse(), Ok(Command::Tap(Coord2::new(-1, 4))));
    }

    #[test]
    fn parses_new_with_optional_arguments() {
        assert_eq!(
            "new".parse(),
            Ok(Command::New {
                size: None,
                difficulty: None
            })
        );
        assert_eq!(
            "new 9 easy".parse(),
            Ok(Command::New {
                size: Some(9),
                difficulty: Some(Difficulty::Easy)
            })
        );
        assert_eq!(
            "new 9 brutal".parse::<Command>(),
            Err(ParseError::Difficulty(GameError::Configuration(
                ConfigError::UnknownDifficulty
            )))
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!(
            "r 1".parse::<Command>(),
            Err(ParseError::MissingArgument("row"))
        );
        assert_eq!(
            "r one 2".parse::<Command>(),
            Err(ParseError::InvalidNumber("one".to_string()))
        );
        assert_eq!(
            "show all".parse::<Command>(),
            Err(ParseError::TrailingArgument("all".to_string()))
        );
        assert_eq!(
            "dig 1 1".parse::<Command>(),
            Err(ParseError::Unknown("dig".to_string()))
        );
    }
}
