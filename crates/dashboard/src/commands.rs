use crate::{FilterKind, FilterValue};

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Filter(FilterKind, FilterValue),
    Page(i64),
    Search(String),
    Show,
    Quit,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("page expects a number, got {0:?}")]
    BadPage(String),
}

impl Command {
    /// Parse `fuel|state|vehicle <value>`, `page <n>`, `search <text>`, `show`, `quit`.
    ///
    /// Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let filter = |kind: FilterKind| -> Result<Option<Command>, CommandError> {
            let value = rest.parse::<FilterValue>().unwrap_or_default();
            Ok(Some(Command::Filter(kind, value)))
        };

        match verb.to_lowercase().as_str() {
            "fuel" => filter(FilterKind::Fuel),
            "state" => filter(FilterKind::State),
            "vehicle" => filter(FilterKind::Vehicle),
            "page" => rest
                .parse::<i64>()
                .map(|n| Some(Command::Page(n)))
                .map_err(|_| CommandError::BadPage(rest.to_string())),
            // keeps inner spacing; the search pipeline normalizes
            "search" => Ok(Some(Command::Search(rest.to_string()))),
            "show" => Ok(Some(Command::Show)),
            "quit" | "exit" => Ok(Some(Command::Quit)),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
