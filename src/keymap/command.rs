use std::fmt;
use std::str::FromStr;

use crate::compare::CompareCommand;

/// Symbolic command vocabulary shared by the key maps and their handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleHelp,

    SelectFolder,
    NavigateUp,
    NavigateDown,
    NavigateLeft,
    NavigateRight,

    StartComparison,
    ToggleSelect,
    SelectAll,
    SelectByGlob,
    GoBack,

    Compare(CompareCommand),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown command `{0}`")]
pub struct UnknownCommand(pub String);

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::ToggleHelp => "toggleHelp",
            Command::SelectFolder => "selectFolder",
            Command::NavigateUp => "navigateUp",
            Command::NavigateDown => "navigateDown",
            Command::NavigateLeft => "navigateLeft",
            Command::NavigateRight => "navigateRight",
            Command::StartComparison => "startComparison",
            Command::ToggleSelect => "toggleSelect",
            Command::SelectAll => "selectAll",
            Command::SelectByGlob => "selectByGlob",
            Command::GoBack => "goBack",
            Command::Compare(c) => c.as_str(),
        }
    }

    pub fn compare(self) -> Option<CompareCommand> {
        match self {
            Command::Compare(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(c) = s.parse::<CompareCommand>() {
            return Ok(Command::Compare(c));
        }
        let cmd = match s {
            "toggleHelp" => Command::ToggleHelp,
            "selectFolder" => Command::SelectFolder,
            "navigateUp" => Command::NavigateUp,
            "navigateDown" => Command::NavigateDown,
            "navigateLeft" => Command::NavigateLeft,
            "navigateRight" => Command::NavigateRight,
            "startComparison" => Command::StartComparison,
            "toggleSelect" => Command::ToggleSelect,
            "selectAll" => Command::SelectAll,
            "selectByGlob" => Command::SelectByGlob,
            "goBack" => Command::GoBack,
            other => return Err(UnknownCommand(other.to_string())),
        };
        Ok(cmd)
    }
}

impl From<CompareCommand> for Command {
    fn from(value: CompareCommand) -> Self {
        Command::Compare(value)
    }
}
