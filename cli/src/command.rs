use std::str::FromStr;

use sweeper_core::{Coord, Coord2};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command {0:?}")]
    Unknown(String),
    #[error("Command {0:?} expects a row and a column")]
    MissingCoords(String),
    #[error("Invalid coordinate {0:?}")]
    InvalidCoord(String),
}

/// One player action, parsed from a line such as `s 3 4` or `restart`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Sweep(Coord2),
    Mark(Coord2),
    Unmark(Coord2),
    Toggle(Coord2),
    Restart,
    NewGame,
    Revive,
    RevealBombs,
    RandomFlags,
    ClearFlags,
    Print,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();

        let mut coords = || -> Result<Coord2, CommandError> {
            let mut next = || {
                let word = words
                    .next()
                    .ok_or_else(|| CommandError::MissingCoords(name.clone()))?;
                word.parse::<Coord>()
                    .map_err(|_| CommandError::InvalidCoord(word.to_string()))
            };
            Ok((next()?, next()?))
        };

        Ok(match name.as_str() {
            "s" | "sweep" => Self::Sweep(coords()?),
            "m" | "mark" => Self::Mark(coords()?),
            "u" | "unmark" => Self::Unmark(coords()?),
            "f" | "flag" | "toggle" => Self::Toggle(coords()?),
            "restart" => Self::Restart,
            "new" => Self::NewGame,
            "revive" => Self::Revive,
            "reveal" => Self::RevealBombs,
            "random-flags" => Self::RandomFlags,
            "clear-flags" => Self::ClearFlags,
            "p" | "print" => Self::Print,
            other => return Err(CommandError::Unknown(other.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cell_commands() {
        assert_eq!("s 3 4".parse(), Ok(Command::Sweep((3, 4))));
        assert_eq!("FLAG 0 8".parse(), Ok(Command::Toggle((0, 8))));
        assert_eq!("  m   1  2 ".parse(), Ok(Command::Mark((1, 2))));
        assert_eq!("unmark 5 5".parse(), Ok(Command::Unmark((5, 5))));
    }

    #[test]
    fn parses_game_commands() {
        assert_eq!("restart".parse(), Ok(Command::Restart));
        assert_eq!("new".parse(), Ok(Command::NewGame));
        assert_eq!("clear-flags".parse(), Ok(Command::ClearFlags));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "jump 1 1".parse::<Command>(),
            Err(CommandError::Unknown("jump".to_string()))
        );
        assert_eq!(
            "s 1".parse::<Command>(),
            Err(CommandError::MissingCoords("s".to_string()))
        );
        assert_eq!(
            "s 1 -2".parse::<Command>(),
            Err(CommandError::InvalidCoord("-2".to_string()))
        );
    }
}
