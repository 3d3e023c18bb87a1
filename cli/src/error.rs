use std::fmt;
use shared::WheelError;
use crate::commands::CommandError;
use crate::config::ConfigError;

#[derive(Debug)]
pub enum CliError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(ConfigError),
    Command(CommandError),
    Wheel(WheelError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::Config(e) => write!(f, "Configuration error: {}", e),
            Self::Command(e) => write!(f, "{}", e),
            Self::Wheel(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Command(e) => Some(e),
            Self::Wheel(e) => Some(e),
        }
    }
}

impl CliError {
    /// Errors the user can fix by typing something else; the session keeps
    /// running after these.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Command(_) | Self::Wheel(_))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        Self::Command(err)
    }
}

impl From<WheelError> for CliError {
    fn from(err: WheelError) -> Self {
        Self::Wheel(err)
    }
}
