use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    Add,
    Label,
    Toggle,
    Done,
    Remove,
    List,
    Json,
    Spin,
    Cancel,
    Help,
    #[strum(to_string = "quit", serialize = "exit")]
    Quit,
}

impl Verb {
    pub fn usage(&self) -> &'static str {
        match self {
            Self::Add => "add [+] [label]    add an option (+ puts it in play)",
            Self::Label => "label <n> <text>   rename option n",
            Self::Toggle => "toggle <n>         put option n in or out of play",
            Self::Done => "done <n>           finish editing option n",
            Self::Remove => "remove <n>         delete option n",
            Self::List => "list               show the options",
            Self::Json => "json               print a JSON snapshot",
            Self::Spin => "spin               spin the wheel",
            Self::Cancel => "cancel             stop the current spin",
            Self::Help => "help               show this help",
            Self::Quit => "quit               leave",
        }
    }
}

pub fn help_text() -> String {
    Verb::iter()
        .map(|verb| format!("  {}", verb.usage()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A parsed input line. Positions are zero-based here and one-based on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { active: bool, label: Option<String> },
    Label { position: usize, text: String },
    Toggle(usize),
    Done(usize),
    Remove(usize),
    List,
    Json,
    Spin,
    Cancel,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    UnknownVerb(String),
    MissingPosition(Verb),
    BadPosition(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Type a command, or 'help'"),
            Self::UnknownVerb(verb) => write!(f, "Unknown command '{}', try 'help'", verb),
            Self::MissingPosition(verb) => write!(f, "Usage: {}", verb.usage()),
            Self::BadPosition(value) => write!(f, "'{}' is not an option number", value),
        }
    }
}

impl std::error::Error for CommandError {}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim_start()))
            .unwrap_or((line, ""));
        let verb: Verb = word
            .parse()
            .map_err(|_| CommandError::UnknownVerb(word.to_string()))?;

        let command = match verb {
            Verb::Add => {
                let (active, label) = match rest.strip_prefix('+') {
                    Some(label) => (true, label.trim()),
                    None => (false, rest),
                };
                Command::Add {
                    active,
                    label: (!label.is_empty()).then(|| label.to_string()),
                }
            }
            Verb::Label => {
                let (position, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Command::Label {
                    position: parse_position(verb, position)?,
                    text: text.trim().to_string(),
                }
            }
            Verb::Toggle => Command::Toggle(parse_position(verb, rest)?),
            Verb::Done => Command::Done(parse_position(verb, rest)?),
            Verb::Remove => Command::Remove(parse_position(verb, rest)?),
            Verb::List => Command::List,
            Verb::Json => Command::Json,
            Verb::Spin => Command::Spin,
            Verb::Cancel => Command::Cancel,
            Verb::Help => Command::Help,
            Verb::Quit => Command::Quit,
        };
        Ok(command)
    }
}

fn parse_position(verb: Verb, value: &str) -> Result<usize, CommandError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CommandError::MissingPosition(verb));
    }
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::BadPosition(value.to_string())),
    }
}
