use core_events::NotationError;
use thiserror::Error;

/// Failure of a single command. The mode that ran the command reports it to
/// the user and leaves the editor state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Character '{0}' not found")]
    CharNotFound(char),
    #[error("No previous find-char command")]
    NoPreviousFind,
    #[error("E486: Pattern not found: {0}")]
    PatternNotFound(String),
    #[error("E35: No previous regular expression")]
    NoPreviousSearch,
    #[error("E383: Invalid search string: {0}")]
    InvalidPattern(String),
    #[error("E353: Nothing in register {0}")]
    EmptyRegister(char),
    #[error("E492: Not an editor command: {0}")]
    UnknownCommand(String),
    #[error("E474: Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("E31: No such mapping")]
    NoSuchMapping,
    #[error("E223: recursive mapping")]
    RecursiveMapping,
    #[error("Cannot {0} past the line end")]
    PastLineEnd(&'static str),
    #[error(transparent)]
    Notation(#[from] NotationError),
}

pub type CommandResult<T> = Result<T, CommandError>;
